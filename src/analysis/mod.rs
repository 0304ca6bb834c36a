// Extraction pipeline: stage, scan, render, clean up

pub mod staging;

pub use staging::{stage_archive, StagedArchive};

use crate::config::Config;
use crate::error::Result;
use crate::output::DiagramRenderer;
use crate::scanner::{scan_tree, DirectoryTree, SourceScanner};
use serde::Serialize;
use std::path::Path;

/// Result of extracting one archive
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Directory hierarchy of the archive contents
    pub structure: DirectoryTree,
    /// Rendered class diagram
    pub diagram: String,
    /// Counters for reporting
    pub stats: ExtractionStats,
}

/// Counts gathered while extracting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub files_scanned: usize,
    pub classes: usize,
    pub inheritance_edges: usize,
    pub module_functions: usize,
}

/// Runs the stage → tree scan → source scan → render sequence
pub struct Extractor {
    config: Config,
    verbose: bool,
}

impl Extractor {
    /// Create a new extractor with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            verbose: false,
        })
    }

    /// Create extractor with verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract structure and diagram from the archive at `archive`.
    ///
    /// The staged copy is removed on every exit path. Any failure aborts
    /// the whole call; no partial result is returned.
    pub fn extract(&self, archive: &Path) -> Result<Extraction> {
        let staged = stage_archive(archive, &self.config.staging)?;
        let extraction = self.analyze_dir(staged.root())?;
        release(staged);

        log::info!(
            "Extracted {}: {} files scanned, {} classes, {} edges, {} module functions",
            archive.display(),
            extraction.stats.files_scanned,
            extraction.stats.classes,
            extraction.stats.inheritance_edges,
            extraction.stats.module_functions
        );

        Ok(extraction)
    }

    /// Scan an already unpacked directory
    pub fn analyze_dir(&self, root: &Path) -> Result<Extraction> {
        let structure = scan_tree(root, self.config.analysis.sort_entries)?;

        let scanner = SourceScanner::new(&self.config.analysis)?.with_verbose(self.verbose);
        let scan = scanner.scan(root)?;

        let diagram = DiagramRenderer::from_config(&self.config.diagram).render(&scan);

        let stats = ExtractionStats {
            files_scanned: scan.files_scanned(),
            classes: scan.classes().len(),
            inheritance_edges: scan.edges().len(),
            module_functions: scan.module_functions().function_count(),
        };

        Ok(Extraction {
            structure,
            diagram,
            stats,
        })
    }
}

/// Remove the staged copy; a failed removal is logged and never fails the call
fn release(staged: StagedArchive) {
    let root = staged.root().to_path_buf();
    if let Err(e) = staged.close() {
        log::warn!("Failed to remove staged directory {}: {}", root.display(), e);
    }
}

/// Extract `(structure, diagram)` from an archive using default settings
pub fn extract(archive: &Path) -> Result<(DirectoryTree, String)> {
    let extraction = Extractor::new(Config::default())?.extract(archive)?;
    Ok((extraction.structure, extraction.diagram))
}

// Line-oriented source scanning
//
// Recovers classes, methods, attributes and module-level functions with
// per-line regular expressions. There is no tokenizer: nested classes,
// decorators, multi-line signatures and re-opened class bodies are not
// tracked. Swapping this for a real parser only has to produce the same
// `ScanResult`.

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::scanner::model::ScanResult;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::cmp::Ordering;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// `class Name:` or `class Name(Parent):`, matched on the trimmed line
const CLASS_PATTERN: &str = r"^class\s+(\w+)(?:\((\w+)\))?:";
/// Indented `def name(`
const METHOD_PATTERN: &str = r"^\s+def\s+(\w+)\s*\(";
/// Indented `self.name =`
const ATTRIBUTE_PATTERN: &str = r"^\s+self\.(\w+)\s*=";
/// `def name(` at column zero
const FUNCTION_PATTERN: &str = r"^def\s+(\w+)\s*\(";

struct LinePatterns {
    class_decl: Regex,
    method: Regex,
    attribute: Regex,
    function: Regex,
}

impl LinePatterns {
    fn compile() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::other(format!("invalid pattern {pattern}: {e}")))
        };
        Ok(Self {
            class_decl: compile(CLASS_PATTERN)?,
            method: compile(METHOD_PATTERN)?,
            attribute: compile(ATTRIBUTE_PATTERN)?,
            function: compile(FUNCTION_PATTERN)?,
        })
    }
}

/// Scans every source file under a root into a [`ScanResult`]
pub struct SourceScanner {
    suffix: String,
    sort_entries: bool,
    verbose: bool,
    patterns: LinePatterns,
}

impl SourceScanner {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            suffix: format!(".{}", config.extension),
            sort_entries: config.sort_entries,
            verbose: false,
            patterns: LinePatterns::compile()?,
        })
    }

    /// Show a spinner while files are scanned
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Walk `root` and scan every matching file.
    ///
    /// Every directory visited gets an entry in the module-function index.
    /// A directory's files are scanned before any of its subdirectories.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let mut result = ScanResult::new();

        let progress = if self.verbose {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {pos} files {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            Some(pb)
        } else {
            None
        };

        let sort = self.sort_entries;
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by(move |a, b| walk_order(a, b, sort));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type().is_dir() {
                result.visit_dir(&relative_key(path, root));
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !file_name.ends_with(&self.suffix) {
                continue;
            }

            if let Some(ref pb) = progress {
                pb.set_message(file_name.to_string());
                pb.inc(1);
            }

            let bytes = std::fs::read(path).map_err(|e| Error::scan(path, e))?;
            let source = decode_ignoring_errors(&bytes);
            let rel_dir = path
                .parent()
                .map(|parent| relative_key(parent, root))
                .unwrap_or_else(|| ".".to_string());
            let rel_file = relative_key(path, root);

            log::debug!("scanning {}", rel_file);
            self.scan_source(&source, &rel_dir, &rel_file, &mut result);
            result.record_file();
        }

        if let Some(pb) = progress {
            pb.finish_with_message("scan complete");
        }

        Ok(result)
    }

    /// Scan one file's text into `result`.
    ///
    /// `rel_dir` keys module-level functions, `rel_file` is stored on newly
    /// declared classes. The current class starts empty for every file and
    /// each class declaration replaces it.
    pub fn scan_source(&self, source: &str, rel_dir: &str, rel_file: &str, result: &mut ScanResult) {
        let mut current: Option<usize> = None;

        for line in source.lines() {
            if let Some(caps) = self.patterns.class_decl.captures(line.trim()) {
                let name = &caps[1];
                current = Some(result.declare_class(name, rel_file));
                if let Some(parent) = caps.get(2) {
                    result.add_edge(parent.as_str(), name);
                }
            } else if let Some(class) = current {
                if let Some(caps) = self.patterns.method.captures(line) {
                    result.add_method(class, &caps[1]);
                }
                if let Some(caps) = self.patterns.attribute.captures(line) {
                    result.add_attribute(class, &caps[1]);
                }
            } else if let Some(caps) = self.patterns.function.captures(line) {
                result.add_module_function(rel_dir, &caps[1]);
            }
        }
    }
}

/// Files before directories; by name as well when sorting is on
fn walk_order(a: &DirEntry, b: &DirEntry, sort: bool) -> Ordering {
    let order = a.file_type().is_dir().cmp(&b.file_type().is_dir());
    if sort {
        order.then_with(|| a.file_name().cmp(b.file_name()))
    } else {
        order
    }
}

/// Path relative to `root` joined with `/`; the root itself is `"."`
pub(crate) fn relative_key(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Decode UTF-8, dropping invalid byte sequences instead of failing
fn decode_ignoring_errors(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

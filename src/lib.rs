//! Infera - Extract directory structure and class diagrams from zipped codebases
//!
//! Unpacks an archive into a scratch directory, mirrors its directory tree,
//! scans source files line by line for classes, methods, attributes and
//! module-level functions, and renders a Mermaid class diagram.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod uploads;

// Re-export main types
pub use analysis::{extract, Extraction, ExtractionStats, Extractor, StagedArchive};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{DiagramRenderer, Envelope};
pub use scanner::{ClassInfo, DirectoryTree, InheritanceEdge, ModuleFunctionIndex, ScanResult, SourceScanner, TreeNode};
pub use uploads::{UploadRecord, UploadStore};

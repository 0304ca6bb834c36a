// Scanners that turn a staged directory into structure and class facts

pub mod model;
pub mod source;
pub mod tree;

pub use model::*;
pub use source::SourceScanner;
pub use tree::{scan_tree, DirectoryTree, TreeNode};

// Directory tree scanning
//
// Mirrors a filesystem hierarchy as nested name-keyed maps. Files map to
// `null` when serialized, directories to another map.

use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs;
use std::path::Path;

/// One level of a scanned directory, in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryTree {
    entries: Vec<(String, TreeNode)>,
}

/// An entry inside a [`DirectoryTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File,
    Directory(DirectoryTree),
}

impl DirectoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `node`, replacing an existing binding in place
    pub fn insert(&mut self, name: impl Into<String>, node: TreeNode) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = node,
            None => self.entries.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    /// Look up a subdirectory by name
    pub fn subdir(&self, name: &str) -> Option<&DirectoryTree> {
        match self.get(name) {
            Some(TreeNode::Directory(tree)) => Some(tree),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreeNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count files at every depth
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, node)| match node {
                TreeNode::File => 1,
                TreeNode::Directory(tree) => tree.file_count(),
            })
            .sum()
    }
}

impl TreeNode {
    pub fn is_file(&self) -> bool {
        matches!(self, TreeNode::File)
    }
}

impl Serialize for DirectoryTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TreeNode::File => serializer.serialize_none(),
            TreeNode::Directory(tree) => tree.serialize(serializer),
        }
    }
}

/// Recursively scan `root` into a [`DirectoryTree`].
///
/// Symlinks are never followed: a link (to a file or a directory) is
/// recorded as a file, so cyclic links cannot cause unbounded recursion.
/// With `sort` set, entries are ordered by name; otherwise the platform's
/// listing order is kept.
pub fn scan_tree(root: &Path, sort: bool) -> Result<DirectoryTree> {
    let reader = fs::read_dir(root).map_err(|e| Error::scan(root, e))?;

    let mut entries = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| Error::scan(root, e))?;
        let file_type = entry.file_type().map_err(|e| Error::scan(entry.path(), e))?;
        entries.push((entry, file_type.is_dir()));
    }

    if sort {
        entries.sort_by_key(|(entry, _)| entry.file_name());
    }

    let mut tree = DirectoryTree::new();
    for (entry, is_dir) in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let node = if is_dir {
            TreeNode::Directory(scan_tree(&entry.path(), sort)?)
        } else {
            TreeNode::File
        };
        tree.insert(name, node);
    }

    Ok(tree)
}

// Aggregate tables produced by the source scanner
//
// Everything here keeps discovery order: the diagram renderer walks these
// tables front to back and never sorts.

use serde::Serialize;
use std::collections::HashMap;

/// A discovered class and the members found in its body
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class name, unique across the scanned tree
    pub name: String,
    /// Method names in the order they appeared
    pub methods: Vec<String>,
    /// `self.<name> = ...` attribute names in the order they appeared
    pub attributes: Vec<String>,
    /// File (relative to the scan root) where the class was first declared
    pub file: String,
}

impl ClassInfo {
    pub fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            methods: Vec::new(),
            attributes: Vec::new(),
            file: file.to_string(),
        }
    }

    /// Attributes followed by methods, the order they are drawn in
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .chain(self.methods.iter())
            .map(String::as_str)
    }

    pub fn has_members(&self) -> bool {
        !self.attributes.is_empty() || !self.methods.is_empty()
    }
}

/// A `class Child(Parent)` relationship.
///
/// The parent is kept as written; it may name a class that was never
/// discovered.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InheritanceEdge {
    pub parent: String,
    pub child: String,
}

impl InheritanceEdge {
    pub fn new(parent: &str, child: &str) -> Self {
        Self {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }
}

/// Top-level functions grouped by the directory of the file declaring them.
///
/// Keys are relative directory paths with `/` separators; the scan root
/// itself is `"."`. Directories are kept in the order they were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFunctionIndex {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

impl ModuleFunctionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `dir` has an entry, even if it ends up empty
    pub fn ensure_dir(&mut self, dir: &str) -> usize {
        if let Some(&pos) = self.positions.get(dir) {
            return pos;
        }
        let pos = self.entries.len();
        self.entries.push((dir.to_string(), Vec::new()));
        self.positions.insert(dir.to_string(), pos);
        pos
    }

    pub fn push(&mut self, dir: &str, function: &str) {
        let pos = self.ensure_dir(dir);
        self.entries[pos].1.push(function.to_string());
    }

    pub fn get(&self, dir: &str) -> Option<&[String]> {
        self.positions
            .get(dir)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn contains_dir(&self, dir: &str) -> bool {
        self.positions.contains_key(dir)
    }

    /// Iterate directories in visit order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(dir, funcs)| (dir.as_str(), funcs.as_slice()))
    }

    pub fn dir_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of functions across all directories
    pub fn function_count(&self) -> usize {
        self.entries.iter().map(|(_, funcs)| funcs.len()).sum()
    }
}

impl Serialize for ModuleFunctionIndex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (dir, funcs) in &self.entries {
            map.serialize_entry(dir, funcs)?;
        }
        map.end()
    }
}

/// Everything one source scan discovered
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    classes: Vec<ClassInfo>,
    #[serde(skip)]
    class_positions: HashMap<String, usize>,
    edges: Vec<InheritanceEdge>,
    module_functions: ModuleFunctionIndex,
    files_scanned: usize,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classes in discovery order
    pub fn classes(&self) -> &[ClassInfo] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.class_positions.get(name).map(|&pos| &self.classes[pos])
    }

    /// Inheritance edges in discovery order
    pub fn edges(&self) -> &[InheritanceEdge] {
        &self.edges
    }

    pub fn module_functions(&self) -> &ModuleFunctionIndex {
        &self.module_functions
    }

    /// Number of source files that were read
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// Register a class declaration and return its slot.
    ///
    /// A name seen before reuses the existing slot: members accumulate and
    /// the first declaring file is kept.
    pub(crate) fn declare_class(&mut self, name: &str, file: &str) -> usize {
        if let Some(&pos) = self.class_positions.get(name) {
            return pos;
        }
        let pos = self.classes.len();
        self.classes.push(ClassInfo::new(name, file));
        self.class_positions.insert(name.to_string(), pos);
        pos
    }

    pub(crate) fn add_method(&mut self, class: usize, method: &str) {
        self.classes[class].methods.push(method.to_string());
    }

    pub(crate) fn add_attribute(&mut self, class: usize, attribute: &str) {
        self.classes[class].attributes.push(attribute.to_string());
    }

    pub(crate) fn add_edge(&mut self, parent: &str, child: &str) {
        self.edges.push(InheritanceEdge::new(parent, child));
    }

    pub(crate) fn visit_dir(&mut self, dir: &str) {
        self.module_functions.ensure_dir(dir);
    }

    pub(crate) fn add_module_function(&mut self, dir: &str, function: &str) {
        self.module_functions.push(dir, function);
    }

    pub(crate) fn record_file(&mut self) {
        self.files_scanned += 1;
    }
}

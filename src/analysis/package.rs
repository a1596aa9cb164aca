// The crawled package aggregate

use crate::analysis::graph::{build_edges, Edge, StructureGraph};
use crate::output::PackageDocument;
use crate::parser::Module;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Snapshot of every module found under a crawl root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    /// Absolute crawl root
    pub root_path: PathBuf,
    /// Top-level package names in discovery order
    pub roots: Vec<String>,
    /// Modules keyed by dotted name
    pub modules: BTreeMap<String, Module>,
    /// Files that failed to parse (path -> error message)
    pub parse_errors: BTreeMap<PathBuf, String>,
    /// Files whose module was replaced by a later file with the same dotted name
    pub shadowed: Vec<PathBuf>,
}

impl Package {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    /// Insert a module, replacing any module with the same name.
    ///
    /// Returns the replaced module.
    pub fn insert_module(&mut self, module: Module) -> Option<Module> {
        let displaced = self.modules.insert(module.name.clone(), module);
        if let Some(old) = &displaced {
            self.shadowed.push(old.path.clone());
        }
        displaced
    }

    pub fn get_module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Relationship edges, recomputed from the current modules
    pub fn build_edges(&self) -> Vec<Edge> {
        build_edges(self.modules.values())
    }

    /// Dictionary form of the package, as written to JSON
    pub fn to_document(&self) -> PackageDocument {
        PackageDocument::from(self)
    }

    /// Directed graph of the package's relationships
    pub fn graph(&self) -> StructureGraph {
        StructureGraph::from_modules(self.modules.values())
    }
}

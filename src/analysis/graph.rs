// Relationship edges derived from a crawled package
//
// Edges are never stored on the package; they are recomputed from the
// modules on every call so they can't drift out of sync.

use crate::parser::Module;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of edge in the structure graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Module defines a class or top-level function
    ModuleContains,
    /// Class defines a method
    ClassContains,
    /// Class lists a base class
    Inherits,
    /// Module imports another module by name
    Imports,
}

/// An edge between two qualified names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(kind: EdgeKind, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Derive the edges of a sequence of modules, in module order.
///
/// Per class: one `module_contains`, then `class_contains` per method, then
/// `inherits` per base (unresolved, not deduplicated). Then one
/// `module_contains` per function and one `imports` per import.
pub fn build_edges<'a>(modules: impl IntoIterator<Item = &'a Module>) -> Vec<Edge> {
    let mut edges = Vec::new();

    for module in modules {
        let mname = module.name.as_str();
        for class in &module.classes {
            let qualified = format!("{}.{}", mname, class.name);
            edges.push(Edge::new(EdgeKind::ModuleContains, mname, qualified.as_str()));
            for method in &class.methods {
                edges.push(Edge::new(
                    EdgeKind::ClassContains,
                    qualified.as_str(),
                    format!("{}.{}", qualified, method.name),
                ));
            }
            for base in &class.bases {
                edges.push(Edge::new(EdgeKind::Inherits, qualified.as_str(), base.as_str()));
            }
        }
        for func in &module.functions {
            edges.push(Edge::new(
                EdgeKind::ModuleContains,
                mname,
                format!("{}.{}", mname, func.name),
            ));
        }
        for import in &module.imports {
            edges.push(Edge::new(EdgeKind::Imports, mname, import.as_str()));
        }
    }

    edges
}

/// Directed graph over qualified names
#[derive(Debug, Default)]
pub struct StructureGraph {
    graph: DiGraph<String, EdgeKind>,
    index: HashMap<String, NodeIndex>,
}

impl StructureGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph holding every module and every edge endpoint
    pub fn from_modules<'a>(modules: impl IntoIterator<Item = &'a Module> + Clone) -> Self {
        let mut graph = Self::new();
        for module in modules.clone() {
            graph.add_node(&module.name);
        }
        for edge in build_edges(modules) {
            graph.add_edge(&edge);
        }
        graph
    }

    /// Add a node if not already present
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, edge: &Edge) {
        let from = self.add_node(&edge.from);
        let to = self.add_node(&edge.to);
        self.graph.add_edge(from, to, edge.kind);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Names reached from `from` over edges of `kind`, in insertion order
    pub fn targets(&self, from: &str, kind: EdgeKind) -> Vec<&str> {
        self.neighbors(from, kind, Direction::Outgoing)
    }

    /// Names pointing at `to` over edges of `kind`, in insertion order
    pub fn sources(&self, to: &str, kind: EdgeKind) -> Vec<&str> {
        self.neighbors(to, kind, Direction::Incoming)
    }

    fn neighbors(&self, name: &str, kind: EdgeKind, dir: Direction) -> Vec<&str> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut found: Vec<(usize, &str)> = self
            .graph
            .edges_directed(idx, dir)
            .filter(|e| *e.weight() == kind)
            .map(|e| {
                let other = if dir == Direction::Outgoing {
                    e.target()
                } else {
                    e.source()
                };
                (e.id().index(), self.graph[other].as_str())
            })
            .collect();
        // petgraph walks adjacency lists newest first
        found.sort_by_key(|(id, _)| *id);
        found.into_iter().map(|(_, name)| name).collect()
    }
}

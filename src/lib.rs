//! pyarch - Map the structure of Python source trees
//!
//! Crawls a directory of Python files and records, per module, its
//! classes, top-level functions and imports. The resulting package can be
//! rendered as an ASCII tree, a JSON document or a Mermaid class diagram.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;

// Re-export main types
pub use analysis::{crawl, Crawler, Edge, EdgeKind, Package, StructureGraph};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{render_tree, to_json, AsDocument, DetailLevel, DiagramGenerator, PackageDocument};
pub use parser::{Class, Function, Module, ModuleBuilder};

// Parser module for extracting module structure from Python source files

pub mod ast;
pub mod builder;
pub mod names;
mod python;

pub use ast::*;
pub use builder::{extract_module, ModuleBuilder};
pub use names::expression_to_name;
pub use python::{PythonParser, SyntaxTree};

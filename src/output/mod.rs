// Output generation module

pub mod diagrams;
pub mod json;
pub mod tree;

pub use diagrams::*;
pub use json::*;
pub use tree::render_tree;

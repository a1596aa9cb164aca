// Python parser using tree-sitter

use crate::error::{Error, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed source file together with the text it was parsed from
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl SyntaxTree {
    /// The `module` node at the top of the tree
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source bytes that node ranges index into
    pub fn source(&self) -> &[u8] {
        self.source.as_bytes()
    }
}

/// Parser for Python source files
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    /// Create a new Python parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        parser
            .set_language(&language)
            .map_err(|e| Error::parser(format!("Failed to set Python language: {}", e)))?;
        Ok(Self { parser })
    }

    /// Read and parse a Python file.
    ///
    /// Unreadable files, undecodable bytes and syntax errors all surface as
    /// [`Error::Parse`] so callers can treat them as one skip decision.
    pub fn parse_file(&mut self, path: &Path) -> Result<SyntaxTree> {
        let bytes = std::fs::read(path).map_err(|e| Error::parse(path, e.to_string()))?;
        let source = decode(bytes, path)?;
        self.parse_source(source, path)
    }

    /// Parse Python source text; `path` is only used in error messages
    pub fn parse_source(&mut self, source: String, path: &Path) -> Result<SyntaxTree> {
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| Error::parse(path, "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => {
                    let pos = node.start_position();
                    let what = if node.is_missing() {
                        format!("missing {}", node.kind())
                    } else {
                        "invalid syntax".to_string()
                    };
                    format!("{} at line {}, column {}", what, pos.row + 1, pos.column + 1)
                }
                None => "invalid syntax".to_string(),
            };
            return Err(Error::parse(path, message));
        }

        if let Some((node, what)) = first_rejected(root, source.as_bytes()) {
            let pos = node.start_position();
            return Err(Error::parse(
                path,
                format!("{} at line {}, column {}", what, pos.row + 1, pos.column + 1),
            ));
        }

        Ok(SyntaxTree { tree, source })
    }
}

/// Decode file bytes as UTF-8, dropping a leading byte order mark
fn decode(mut bytes: Vec<u8>, path: &Path) -> Result<String> {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }
    String::from_utf8(bytes).map_err(|e| {
        Error::parse(
            path,
            format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
        )
    })
}

/// Find the first ERROR or MISSING node in document order
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Find the first node the grammar accepts but the interpreter does not.
///
/// Covers Python 2 `print`/`exec` statements and compound statements whose
/// body is not indented past its header.
fn first_rejected<'a>(root: Node<'a>, source: &[u8]) -> Option<(Node<'a>, &'static str)> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(what) = rejection(&node, source) {
            return Some((node, what));
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn rejection(node: &Node, source: &[u8]) -> Option<&'static str> {
    match node.kind() {
        "exec_statement" => Some("exec statement"),
        "print_statement" => {
            // `print(...)` and `print >> f` still read as expressions
            let operand = node.child(1)?;
            let as_expression = operand.kind() == "chevron"
                || source.get(operand.start_byte()) == Some(&b'(');
            (!as_expression).then_some("print statement")
        }
        "block" => unindented_block(node),
        _ => None,
    }
}

fn unindented_block(block: &Node) -> Option<&'static str> {
    let header = block.parent()?.start_position();
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    match first {
        None => Some("expected an indented block"),
        Some(statement) => {
            let start = statement.start_position();
            (start.row > header.row && start.column <= header.column)
                .then_some("expected an indented block")
        }
    }
}

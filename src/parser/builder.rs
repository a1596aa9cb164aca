// Module builder: one source file in, one Module record out
//
// Only top-level declarations are visited. Nested functions, classes inside
// functions and statements under `if`/`try` blocks are ignored.

use crate::analysis::resolver::{absolute, module_name_from_path};
use crate::error::Result;
use crate::parser::ast::{Class, Function, Module};
use crate::parser::names::expression_to_name;
use crate::parser::python::{PythonParser, SyntaxTree};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tree_sitter::Node;

/// Top-level statement kinds the builder cares about
enum Declaration<'a> {
    Class(Node<'a>),
    Function {
        node: Node<'a>,
        decorators: Vec<Node<'a>>,
    },
    Import(Node<'a>),
    ImportFrom(Node<'a>),
    FutureImport,
    Other,
}

impl<'a> Declaration<'a> {
    fn classify(node: Node<'a>) -> Self {
        match node.kind() {
            "class_definition" => Declaration::Class(node),
            "function_definition" => Declaration::Function {
                node,
                decorators: Vec::new(),
            },
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(def) if def.kind() == "class_definition" => Declaration::Class(def),
                Some(def) if def.kind() == "function_definition" => Declaration::Function {
                    node: def,
                    decorators: decorator_nodes(&node),
                },
                _ => Declaration::Other,
            },
            "import_statement" => Declaration::Import(node),
            "import_from_statement" => Declaration::ImportFrom(node),
            "future_import_statement" => Declaration::FutureImport,
            _ => Declaration::Other,
        }
    }
}

/// Builds [`Module`] records from Python files
pub struct ModuleBuilder {
    parser: PythonParser,
}

impl ModuleBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Build the module for `file_path`, or `None` if the file does not parse
    pub fn build(&mut self, file_path: &Path, root: &Path) -> Option<Module> {
        self.try_build(file_path, root).ok()
    }

    /// Like [`build`](Self::build) but keeps the reason a file was skipped
    pub fn try_build(&mut self, file_path: &Path, root: &Path) -> Result<Module> {
        let path = absolute(file_path);
        let root = absolute(root);

        let mut name = module_name_from_path(&root, &path);
        if name.is_empty() {
            name = path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
        }

        let tree = self.parser.parse_file(&path)?;
        Ok(extract_module(&name, path, &tree))
    }

    /// Build a module from in-memory source
    pub fn build_source(
        &mut self,
        source: &str,
        name: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Module> {
        let path = path.into();
        let tree = self.parser.parse_source(source.to_string(), &path)?;
        Ok(extract_module(name, path, &tree))
    }
}

/// Walk the top-level statements of a parsed file
pub fn extract_module(name: &str, path: PathBuf, tree: &SyntaxTree) -> Module {
    let source = tree.source();
    let root = tree.root();

    let mut module = Module::new(name, path);
    let mut imports = BTreeSet::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match Declaration::classify(child) {
            Declaration::Class(node) => {
                if let Some(class) = parse_class(&node, source) {
                    module.classes.push(class);
                }
            }
            Declaration::Function { node, decorators } => {
                if let Some(func) = parse_function(&node, &decorators, source) {
                    module.functions.push(func);
                }
            }
            Declaration::Import(node) => imports.extend(parse_import(&node, source)),
            Declaration::ImportFrom(node) => imports.extend(parse_import_from(&node, source)),
            Declaration::FutureImport => {
                imports.insert("__future__".to_string());
            }
            Declaration::Other => {}
        }
    }

    module.imports = imports.into_iter().collect();
    module
}

fn decorator_nodes<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .collect()
}

/// Display name of the expression following `@`
fn decorator_name(decorator: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = decorator.walk();
    let expr = decorator
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment")?;
    Some(expression_to_name(&expr, source))
}

fn identifier(node: &Node, field: &str, source: &[u8]) -> Option<String> {
    let child = node.child_by_field_name(field)?;
    Some(child.utf8_text(source).ok()?.to_string())
}

/// Parse a function definition
fn parse_function(node: &Node, decorators: &[Node], source: &[u8]) -> Option<Function> {
    let name = identifier(node, "name", source)?;
    let mut func = Function::new(&name, node.start_position().row + 1);
    func.decorators = decorators
        .iter()
        .filter_map(|d| decorator_name(d, source))
        .collect();
    Some(func)
}

/// Parse a class definition and its directly nested methods
fn parse_class(node: &Node, source: &[u8]) -> Option<Class> {
    let name = identifier(node, "name", source)?;
    let mut class = Class::new(&name, node.start_position().row + 1);

    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        class.bases = extract_bases(&superclasses, source);
    }

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if let Declaration::Function { node, decorators } = Declaration::classify(child) {
                if let Some(method) = parse_function(&node, &decorators, source) {
                    class.methods.push(method);
                }
            }
        }
    }

    Some(class)
}

/// Positional entries of the superclass list; keyword arguments are not bases
fn extract_bases(node: &Node, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !matches!(c.kind(), "keyword_argument" | "dictionary_splat" | "comment"))
        .map(|c| expression_to_name(&c, source))
        .collect()
}

fn dotted_name(node: &Node, source: &[u8]) -> String {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() == "identifier")
        .filter_map(|c| c.utf8_text(source).ok())
        .collect::<Vec<_>>()
        .join(".")
}

/// `import a.b as c, d` yields `a.b` and `d`
fn parse_import(node: &Node, source: &[u8]) -> Vec<String> {
    let mut cursor = node.walk();
    node.children_by_field_name("name", &mut cursor)
        .filter_map(|child| match child.kind() {
            "dotted_name" => Some(dotted_name(&child, source)),
            "aliased_import" => child
                .child_by_field_name("name")
                .map(|name| dotted_name(&name, source)),
            _ => None,
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// `from x.y import z` yields `x.y`; relative imports drop their leading dots
fn parse_import_from(node: &Node, source: &[u8]) -> Option<String> {
    let module = node.child_by_field_name("module_name")?;
    let name = match module.kind() {
        "dotted_name" => dotted_name(&module, source),
        "relative_import" => {
            let mut cursor = module.walk();
            let inner = module
                .named_children(&mut cursor)
                .find(|c| c.kind() == "dotted_name");
            inner.map(|n| dotted_name(&n, source)).unwrap_or_default()
        }
        _ => String::new(),
    };
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn build(source: &str) -> Module {
        let mut builder = ModuleBuilder::new().unwrap();
        builder.build_source(source, "test", "/abs/test.py").unwrap()
    }

    #[test]
    fn test_empty_file() {
        let module = build("");
        assert!(module.is_empty());
        assert_eq!(module.name, "test");
    }

    #[test]
    fn test_simple_function() {
        let module = build("def hello():\n    pass\n");
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "hello");
        assert_eq!(module.functions[0].line, 1);
    }

    #[test]
    fn test_async_function_is_a_function() {
        let module = build("async def fetch(url):\n    return url\n");
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "fetch");
    }

    #[test]
    fn test_decorated_function_line_and_decorators() {
        let source = "\n@deco1\n@deco2\ndef multi(x):\n    return x\n";
        let module = build(source);
        let func = &module.functions[0];
        assert_eq!(func.name, "multi");
        assert_eq!(func.line, 4);
        assert_eq!(func.decorators, vec!["deco1", "deco2"]);
    }

    #[test]
    fn test_decorator_names() {
        let source = r#"
@times(2)
def add(a, b):
    return a + b

@stringify.register
def _(obj):
    return str(obj)

@functools.lru_cache(maxsize=64)
def fib(n):
    return n
"#;
        let module = build(source);
        let decorators: Vec<&str> = module
            .functions
            .iter()
            .map(|f| f.decorators[0].as_str())
            .collect();
        assert_eq!(decorators, vec!["times", "stringify.register", "functools.lru_cache"]);
    }

    #[test]
    fn test_nested_functions_are_not_visited() {
        let source = "def outer():\n    def inner():\n        pass\n    return inner\n";
        let module = build(source);
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "outer");
    }

    #[test]
    fn test_class_with_bases_and_methods() {
        let source = r#"
class Concrete(PrintableMixin, base.Base):
    __slots__ = ("r",)

    def __init__(self, r=1.0):
        self.r = r

    def area(self):
        return self.r

    @classmethod
    def default(cls):
        return cls(1.0)

    async def refresh(self):
        pass
"#;
        let module = build(source);
        assert_eq!(module.classes.len(), 1);
        let class = &module.classes[0];
        assert_eq!(class.name, "Concrete");
        assert_eq!(class.line, 2);
        assert_eq!(class.bases, vec!["PrintableMixin", "base.Base"]);
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__init__", "area", "default", "refresh"]);
        assert_eq!(class.methods[2].decorators, vec!["classmethod"]);
    }

    #[test]
    fn test_class_keywords_are_not_bases() {
        let source = "class Pluggable(metaclass=RegistryMeta):\n    pass\n\nclass Config(TypedDict, total=False):\n    host: str\n";
        let module = build(source);
        assert!(module.classes[0].bases.is_empty());
        assert_eq!(module.classes[1].bases, vec!["TypedDict"]);
    }

    #[test]
    fn test_subscripted_base_uses_base_name() {
        let module = build("class Box(Generic[T]):\n    pass\n");
        assert_eq!(module.classes[0].bases, vec!["Generic"]);
    }

    #[test]
    fn test_decorated_class_is_collected() {
        let source = "@dataclass(frozen=True)\nclass FrozenCfg:\n    path: str\n";
        let module = build(source);
        assert_eq!(module.classes.len(), 1);
        assert_eq!(module.classes[0].name, "FrozenCfg");
        assert_eq!(module.classes[0].line, 2);
        assert!(module.functions.is_empty());
    }

    #[test]
    fn test_methods_under_conditionals_are_ignored() {
        let source = "class A:\n    if True:\n        def hidden(self):\n            pass\n    def shown(self):\n        pass\n";
        let module = build(source);
        let names: Vec<&str> = module.classes[0].methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["shown"]);
    }

    #[test]
    fn test_imports() {
        let source = r#"
from __future__ import annotations
import os
import numpy as np, os.path
from typing import Any, Callable
from typing import Protocol
from .base import ServiceBase
from ..service import UserService
from . import sibling
"#;
        let module = build(source);
        assert_eq!(
            module.imports,
            vec!["__future__", "base", "numpy", "os", "os.path", "service", "typing"]
        );
    }

    #[test]
    fn test_imports_inside_blocks_are_ignored() {
        let source = "try:\n    import ujson\nexcept ImportError:\n    import json\n";
        let module = build(source);
        assert!(module.imports.is_empty());
    }

    #[test]
    fn test_build_rejects_syntax_error() {
        let mut builder = ModuleBuilder::new().unwrap();
        assert!(builder.build_source("class (:\n", "bad", "/abs/bad.py").is_err());
    }

    #[test]
    fn test_build_from_file_uses_dotted_name() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("__init__.py"), "").unwrap();
        fs::write(pkg.join("mod.py"), "import math\n\ndef area():\n    pass\n").unwrap();

        let mut builder = ModuleBuilder::new().unwrap();
        let module = builder.build(&pkg.join("mod.py"), dir.path()).unwrap();
        assert_eq!(module.name, "pkg.mod");
        assert_eq!(module.imports, vec!["math"]);
        assert!(module.path.is_absolute());
    }

    #[test]
    fn test_root_init_takes_parent_directory_name() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("__init__.py"), "VERSION = '1'\n").unwrap();

        let mut builder = ModuleBuilder::new().unwrap();
        let module = builder.build(&pkg.join("__init__.py"), &pkg).unwrap();
        assert_eq!(module.name, "pkg");
    }

    #[test]
    fn test_root_init_named_through_parent_dir_root() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("pkg");
        fs::create_dir_all(pkg.join("sub")).unwrap();
        fs::write(pkg.join("__init__.py"), "").unwrap();

        let mut builder = ModuleBuilder::new().unwrap();
        let root = pkg.join("sub").join("..");
        let module = builder.build(&root.join("__init__.py"), &root).unwrap();
        assert_eq!(module.name, "pkg");
        assert_eq!(module.path, pkg.join("__init__.py"));
    }

    #[test]
    fn test_build_returns_none_for_broken_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.py"), "def broken(:\n").unwrap();

        let mut builder = ModuleBuilder::new().unwrap();
        assert!(builder.build(&dir.path().join("broken.py"), dir.path()).is_none());
    }
}

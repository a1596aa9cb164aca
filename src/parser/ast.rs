// Structural records extracted from Python source files
//
// These types describe what a module declares at its top level. They are
// serializable so the JSON document can embed them directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A function or method declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Line of the `def` keyword (1-based)
    #[serde(rename = "lineno")]
    pub line: usize,
    /// Decorator display names in source order
    pub decorators: Vec<String>,
}

impl Function {
    pub fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            decorators: Vec::new(),
        }
    }

    pub fn with_decorators<I, S>(mut self, decorators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.decorators = decorators.into_iter().map(Into::into).collect();
        self
    }

    /// Check if this function is private by naming convention (starts with _)
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// A class declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Class {
    /// Class name
    pub name: String,
    /// Line of the `class` keyword (1-based)
    #[serde(rename = "lineno")]
    pub line: usize,
    /// Base classes as written, not resolved
    pub bases: Vec<String>,
    /// Methods in declaration order
    pub methods: Vec<Function>,
}

impl Class {
    pub fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            bases: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bases = bases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_methods(mut self, methods: Vec<Function>) -> Self {
        self.methods = methods;
        self
    }

    /// Get public methods (not starting with _)
    pub fn public_methods(&self) -> impl Iterator<Item = &Function> {
        self.methods.iter().filter(|m| !m.is_private())
    }
}

/// A single parsed source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Module {
    /// Dotted module name relative to the crawl root
    pub name: String,
    /// Absolute path of the source file
    pub path: PathBuf,
    /// Classes defined at the top level
    pub classes: Vec<Class>,
    /// Top-level functions (not methods)
    pub functions: Vec<Function>,
    /// Imported module names, deduplicated and sorted
    pub imports: Vec<String>,
}

impl Module {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Replace the imports, deduplicating and sorting them
    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports
            .into_iter()
            .map(Into::into)
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        self
    }

    /// Check if the module declares nothing
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.functions.is_empty() && self.imports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_new_has_independent_decorators() {
        let mut f1 = Function::new("f1", 1);
        let f2 = Function::new("f2", 2);
        assert!(f1.decorators.is_empty());

        f1.decorators.push("cached".to_string());
        assert_eq!(f1.decorators, vec!["cached"]);
        assert!(f2.decorators.is_empty());
    }

    #[test]
    fn test_function_decorators_keep_order() {
        let f = Function::new("multi", 10).with_decorators(["deco1", "deco2"]);
        assert_eq!(f.decorators, vec!["deco1", "deco2"]);
    }

    #[test]
    fn test_function_is_private() {
        assert!(Function::new("_helper", 1).is_private());
        assert!(Function::new("__init__", 1).is_private());
        assert!(!Function::new("run", 1).is_private());
    }

    #[test]
    fn test_class_defaults_are_independent() {
        let mut c1 = Class::new("A", 1);
        let c2 = Class::new("B", 2);

        c1.bases.push("Base".to_string());
        c1.methods.push(Function::new("m", 3));

        assert_eq!(c1.bases, vec!["Base"]);
        assert_eq!(c1.methods.len(), 1);
        assert!(c2.bases.is_empty() && c2.methods.is_empty());
    }

    #[test]
    fn test_class_populated() {
        let cls = Class::new("Concrete", 5)
            .with_bases(["PrintableMixin", "Base"])
            .with_methods(vec![
                Function::new("area", 10),
                Function::new("default", 11).with_decorators(["classmethod"]),
            ]);

        assert_eq!(cls.bases, vec!["PrintableMixin", "Base"]);
        let names: Vec<&str> = cls.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["area", "default"]);
        assert_eq!(cls.methods[1].decorators, vec!["classmethod"]);
    }

    #[test]
    fn test_class_public_methods() {
        let cls = Class::new("Resource", 1).with_methods(vec![
            Function::new("__init__", 2),
            Function::new("_load", 3),
            Function::new("items", 4),
        ]);
        let public: Vec<&str> = cls.public_methods().map(|m| m.name.as_str()).collect();
        assert_eq!(public, vec!["items"]);
    }

    #[test]
    fn test_module_new_is_empty() {
        let m = Module::new("pkg.m1", "/abs/pkg/m1.py");
        assert!(m.is_empty());
        assert_eq!(m.path, PathBuf::from("/abs/pkg/m1.py"));
    }

    #[test]
    fn test_module_imports_sorted_and_deduplicated() {
        let m = Module::new("pkg.m", "/abs/m.py").with_imports(["sys", "os", "math", "os"]);
        assert_eq!(m.imports, vec!["math", "os", "sys"]);
    }

    #[test]
    fn test_serialization_uses_lineno() {
        let f = Function::new("greet", 44).with_decorators(["simple_deco"]);
        let value = serde_json::to_value(&f).expect("serialize");
        assert_eq!(value["lineno"], 44);
        assert_eq!(value["decorators"][0], "simple_deco");
        assert!(value.get("line").is_none());
    }
}

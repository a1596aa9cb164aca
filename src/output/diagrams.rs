// Diagram generation for pyarch
//
// Generates Mermaid class diagrams for functions, classes, modules and
// whole packages.

use crate::analysis::Package;
use crate::error::{Error, Result};
use crate::parser::{Class, Function, Module};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Layout directions understood by Mermaid
pub const DIRECTIONS: &[&str] = &["TB", "BT", "LR", "RL"];

const STYLE_FILL: &str = "#eef6ff";
const STYLE_STROKE: &str = "#2b6cb0";
const STYLE_COLOR: &str = "#1a365d";

/// How many methods a class block lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    /// Every method
    #[default]
    All,
    /// Methods not starting with `_`
    Public,
    /// No methods
    None,
}

impl DetailLevel {
    pub const ALLOWED: &'static [&'static str] = &["all", "public", "none"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::All => "all",
            DetailLevel::Public => "public",
            DetailLevel::None => "none",
        }
    }

    fn shows(&self, method: &Function) -> bool {
        match self {
            DetailLevel::All => true,
            DetailLevel::Public => !method.is_private(),
            DetailLevel::None => false,
        }
    }
}

impl FromStr for DetailLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(DetailLevel::All),
            "public" => Ok(DetailLevel::Public),
            "none" => Ok(DetailLevel::None),
            other => Err(Error::invalid_argument(other, Self::ALLOWED)),
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagram generator for creating Mermaid class diagrams
#[derive(Debug, Clone)]
pub struct DiagramGenerator {
    detail_level: DetailLevel,
    include_relations: bool,
    include_decorators: bool,
    include_functions: bool,
    include_imports: bool,
    include_module_styling: bool,
    /// Layout direction (TB, LR, BT, RL)
    direction: String,
}

impl DiagramGenerator {
    /// Create a new diagram generator
    pub fn new() -> Self {
        Self {
            detail_level: DetailLevel::All,
            include_relations: true,
            include_decorators: false,
            include_functions: true,
            include_imports: false,
            include_module_styling: false,
            direction: "TB".to_string(),
        }
    }

    /// Set the detail level from its textual name
    pub fn with_detail_level(self, level: &str) -> Result<Self> {
        Ok(self.with_detail(level.parse()?))
    }

    pub fn with_detail(mut self, level: DetailLevel) -> Self {
        self.detail_level = level;
        self
    }

    pub fn with_relations(mut self, include: bool) -> Self {
        self.include_relations = include;
        self
    }

    pub fn with_decorators(mut self, include: bool) -> Self {
        self.include_decorators = include;
        self
    }

    pub fn with_functions(mut self, include: bool) -> Self {
        self.include_functions = include;
        self
    }

    pub fn with_imports(mut self, include: bool) -> Self {
        self.include_imports = include;
        self
    }

    /// Group classes by module (package diagrams only)
    pub fn with_module_styling(mut self, include: bool) -> Self {
        self.include_module_styling = include;
        self
    }

    /// Set layout direction
    pub fn with_direction(mut self, dir: &str) -> Self {
        self.direction = dir.to_string();
        self
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.detail_level
    }

    /// Diagram of a single function
    pub fn function_diagram(&self, func: &Function) -> String {
        let mut lines = self.header();
        let id = sanitize_id(&func.name);
        self.push_function(&mut lines, &id);
        if self.include_decorators {
            self.push_function_note(&mut lines, &id, func);
        }
        lines.join("\n")
    }

    /// Diagram of a single class and its direct bases
    pub fn class_diagram(&self, class: &Class) -> String {
        let mut lines = self.header();
        let id = sanitize_class_name(&class.name);
        self.push_class(&mut lines, &id, class);
        if self.include_relations {
            for base in &class.bases {
                push_inherits(&mut lines, &sanitize_class_name(base), &id);
            }
        }
        if self.include_decorators {
            self.push_method_note(&mut lines, &id, class);
        }
        lines.join("\n")
    }

    /// Diagram of everything a module declares
    pub fn module_diagram(&self, module: &Module) -> String {
        let mut lines = self.header();

        let class_ids: Vec<String> = module
            .classes
            .iter()
            .map(|c| sanitize_class_name(&c.name))
            .collect();
        let function_ids: Vec<String> = module
            .functions
            .iter()
            .map(|f| sanitize_id(&f.name))
            .collect();

        for (class, id) in module.classes.iter().zip(&class_ids) {
            self.push_class(&mut lines, id, class);
        }
        if self.include_functions {
            for id in &function_ids {
                self.push_function(&mut lines, id);
            }
        }

        if self.include_relations {
            for (class, id) in module.classes.iter().zip(&class_ids) {
                for base in &class.bases {
                    push_inherits(&mut lines, &sanitize_class_name(base), id);
                }
            }
        }

        if self.include_decorators {
            for (class, id) in module.classes.iter().zip(&class_ids) {
                self.push_method_note(&mut lines, id, class);
            }
            if self.include_functions {
                for (func, id) in module.functions.iter().zip(&function_ids) {
                    self.push_function_note(&mut lines, id, func);
                }
            }
        }

        if self.include_imports {
            self.push_imports(&mut lines, [module]);
        }

        lines.join("\n")
    }

    /// Diagram of every module in a package.
    ///
    /// Class and function nodes use their simple name when it is unique
    /// across the package, and the sanitized qualified name otherwise.
    pub fn package_diagram(&self, package: &Package) -> String {
        let mut lines = self.header();
        let ids = self.package_ids(package);
        let id_of = |module: &Module, name: &str| node_id(&ids, module, name);

        for module in package.modules.values() {
            for class in &module.classes {
                self.push_class(&mut lines, &id_of(module, class.name.as_str()), class);
            }
            if self.include_functions {
                for func in &module.functions {
                    self.push_function(&mut lines, &id_of(module, func.name.as_str()));
                }
            }
        }

        if self.include_relations {
            for module in package.modules.values() {
                for class in &module.classes {
                    let derived = id_of(module, class.name.as_str());
                    for base in &class.bases {
                        let base_id = match resolve_base(package, module, class, base) {
                            Some((owner, name)) => id_of(owner, name),
                            None => sanitize_class_name(base),
                        };
                        push_inherits(&mut lines, &base_id, &derived);
                    }
                }
            }
        }

        if self.include_decorators {
            for module in package.modules.values() {
                for class in &module.classes {
                    let id = id_of(module, class.name.as_str());
                    self.push_method_note(&mut lines, &id, class);
                }
                if self.include_functions {
                    for func in &module.functions {
                        let id = id_of(module, func.name.as_str());
                        self.push_function_note(&mut lines, &id, func);
                    }
                }
            }
        }

        if self.include_module_styling {
            for module in package.modules.values() {
                let class_ids: Vec<String> = module
                    .classes
                    .iter()
                    .map(|c| id_of(module, c.name.as_str()))
                    .collect();
                push_module_style(&mut lines, &module.name, &class_ids);
            }
        }

        if self.include_imports {
            self.push_imports(&mut lines, package.modules.values());
        }

        lines.join("\n")
    }

    fn header(&self) -> Vec<String> {
        vec![
            "classDiagram".to_string(),
            format!("    direction {}", self.direction),
        ]
    }

    fn push_class(&self, lines: &mut Vec<String>, id: &str, class: &Class) {
        let methods: Vec<&Function> = class
            .methods
            .iter()
            .filter(|m| self.detail_level.shows(m))
            .collect();

        if methods.is_empty() {
            lines.push(format!("    class {}", id));
            return;
        }

        lines.push(format!("    class {} {{", id));
        for method in methods {
            let visibility = if method.is_private() { "-" } else { "+" };
            lines.push(format!("        {}{}()", visibility, method.name));
        }
        lines.push("    }".to_string());
    }

    fn push_function(&self, lines: &mut Vec<String>, id: &str) {
        lines.push(format!("    class {} {{", id));
        lines.push("        <<function>>".to_string());
        lines.push("    }".to_string());
    }

    fn push_function_note(&self, lines: &mut Vec<String>, id: &str, func: &Function) {
        if !func.decorators.is_empty() {
            push_note(lines, id, &decorator_list(func));
        }
    }

    /// One note per class listing the decorators of each rendered method
    fn push_method_note(&self, lines: &mut Vec<String>, id: &str, class: &Class) {
        let entries: Vec<String> = class
            .methods
            .iter()
            .filter(|m| self.detail_level.shows(m) && !m.decorators.is_empty())
            .map(|m| format!("{}(): {}", m.name, decorator_list(m)))
            .collect();
        if !entries.is_empty() {
            push_note(lines, id, &entries.join("\\n"));
        }
    }

    fn push_imports<'a>(
        &self,
        lines: &mut Vec<String>,
        modules: impl IntoIterator<Item = &'a Module>,
    ) {
        let modules: Vec<&Module> = modules
            .into_iter()
            .filter(|m| !m.imports.is_empty())
            .collect();

        for module in &modules {
            lines.push(format!("    class {} {{", sanitize_id(&module.name)));
            lines.push("        <<module>>".to_string());
            lines.push("    }".to_string());
        }
        for module in &modules {
            let from = sanitize_id(&module.name);
            for import in &module.imports {
                lines.push(format!("    {} ..> {} : imports", from, sanitize_id(import)));
            }
        }
    }

    /// Map qualified names to node ids for a package diagram
    fn package_ids(&self, package: &Package) -> HashMap<String, String> {
        let mut names: Vec<(String, String)> = Vec::new();
        for module in package.modules.values() {
            for class in &module.classes {
                names.push((
                    format!("{}.{}", module.name, class.name),
                    sanitize_class_name(&class.name),
                ));
            }
            if self.include_functions {
                for func in &module.functions {
                    names.push((
                        format!("{}.{}", module.name, func.name),
                        sanitize_id(&func.name),
                    ));
                }
            }
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (_, simple) in &names {
            *counts.entry(simple.as_str()).or_default() += 1;
        }

        names
            .iter()
            .map(|(qualified, simple)| {
                let id = if counts.get(simple.as_str()) == Some(&1) {
                    simple.clone()
                } else {
                    sanitize_id(qualified)
                };
                (qualified.clone(), id)
            })
            .collect()
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the crawled class a base name refers to.
///
/// Looks in the deriving class's own module first, then in every module in
/// name order, matching on the last segment of the base.
fn resolve_base<'a>(
    package: &'a Package,
    module: &'a Module,
    class: &Class,
    base: &str,
) -> Option<(&'a Module, &'a str)> {
    let simple = base.rsplit('.').next().unwrap_or(base);
    let is_self = |owner: &Module, candidate: &Class| {
        owner.name == module.name && candidate.name == class.name
    };

    let find = |owner: &'a Module| {
        owner
            .classes
            .iter()
            .find(|c| c.name == simple && !is_self(owner, c))
            .map(|c| (owner, c.name.as_str()))
    };

    find(module).or_else(|| package.modules.values().find_map(find))
}

fn node_id(ids: &HashMap<String, String>, module: &Module, name: &str) -> String {
    let qualified = format!("{}.{}", module.name, name);
    ids.get(&qualified)
        .cloned()
        .unwrap_or_else(|| sanitize_id(&qualified))
}

fn push_inherits(lines: &mut Vec<String>, base: &str, derived: &str) {
    if !base.is_empty() {
        lines.push(format!("    {} <|-- {}", base, derived));
    }
}

fn push_note(lines: &mut Vec<String>, id: &str, text: &str) {
    lines.push(format!("    note for {} \"{}\"", id, escape_note(text)));
}

fn push_module_style(lines: &mut Vec<String>, module: &str, class_ids: &[String]) {
    let Some(first) = class_ids.first() else {
        return;
    };
    let style = sanitize_id(&format!("{}_style", module));
    lines.push(format!(
        "    classDef {} fill:{},stroke:{},stroke-width:1px,color:{};",
        style, STYLE_FILL, STYLE_STROKE, STYLE_COLOR
    ));
    for id in class_ids {
        lines.push(format!("    class {}:::{}", id, style));
    }
    lines.push(format!("    note for {} \"module: {}\"", first, escape_note(module)));
}

fn decorator_list(func: &Function) -> String {
    func.decorators
        .iter()
        .map(|d| format!("@{}", d))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quotes would end the note text early
fn escape_note(text: &str) -> String {
    text.replace('"', "#quot;")
}

/// Sanitize a string for use as a Mermaid node ID
fn sanitize_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Sanitize a class name for Mermaid class diagrams
fn sanitize_class_name(s: &str) -> String {
    // Extract just the class name if it's a dotted path
    let name = s.split('.').next_back().unwrap_or(s);
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

// ASCII tree view of the package hierarchy

use crate::output::json::AsDocument;
use crate::parser::{Class, Module};
use std::collections::BTreeMap;

/// Segment used for a module whose dotted name is empty
const ROOT_SEGMENT: &str = "<root>";

const BRANCH: &str = "├─";
const LAST_BRANCH: &str = "└─";
const PIPE: &str = "│  ";
const SPACE: &str = "   ";

#[derive(Default)]
struct TrieNode<'a> {
    module: Option<&'a Module>,
    children: BTreeMap<&'a str, TrieNode<'a>>,
}

impl<'a> TrieNode<'a> {
    fn insert(&mut self, name: &'a str, module: &'a Module) {
        let mut node = self;
        if name.is_empty() {
            node = node.children.entry(ROOT_SEGMENT).or_default();
        } else {
            for part in name.split('.') {
                node = node.children.entry(part).or_default();
            }
        }
        node.module.get_or_insert(module);
    }
}

enum Entry<'a> {
    Class(&'a Class),
    Function(&'a str),
    Child(&'a str, &'a TrieNode<'a>),
}

/// Render the package as an indented tree of modules, classes and functions.
///
/// The first line names the discovered package roots.
pub fn render_tree(model: &impl AsDocument) -> String {
    let document = model.as_document();

    let mut trie = TrieNode::default();
    for (name, module) in &document.modules {
        trie.insert(name, module);
    }

    let mut lines = Vec::new();
    draw(&trie, "", &mut lines);

    format!(
        "Package roots: {}\n{}",
        document.roots.join(", "),
        lines.join("\n")
    )
}

fn draw(node: &TrieNode<'_>, prefix: &str, lines: &mut Vec<String>) {
    let mut entries = Vec::new();
    if let Some(module) = node.module {
        entries.extend(module.classes.iter().map(Entry::Class));
        entries.extend(module.functions.iter().map(|f| Entry::Function(&f.name)));
    }
    entries.extend(node.children.iter().map(|(k, v)| Entry::Child(*k, v)));

    let count = entries.len();
    for (i, entry) in entries.into_iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { LAST_BRANCH } else { BRANCH };
        let nested = format!("{}{}", prefix, if last { SPACE } else { PIPE });

        match entry {
            Entry::Class(class) => {
                lines.push(format!(
                    "{}{} class {} (bases: {})",
                    prefix,
                    branch,
                    class.name,
                    bases_label(class)
                ));
                let methods = class.methods.len();
                for (j, method) in class.methods.iter().enumerate() {
                    let mbranch = if j + 1 == methods { LAST_BRANCH } else { BRANCH };
                    lines.push(format!("{}{} def {}()", nested, mbranch, method.name));
                }
            }
            Entry::Function(name) => {
                lines.push(format!("{}{} def {}()", prefix, branch, name));
            }
            Entry::Child(segment, child) => {
                lines.push(format!("{}{} {}", prefix, branch, segment));
                draw(child, &nested, lines);
            }
        }
    }
}

fn bases_label(class: &Class) -> String {
    if class.bases.is_empty() {
        "object".to_string()
    } else {
        class.bases.join(", ")
    }
}

// JSON document view of a crawled package

use crate::analysis::{Edge, Package};
use crate::error::{Error, Result};
use crate::parser::Module;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Dictionary form of a [`Package`]
///
/// Key order matches the JSON output: `root_path`, `roots`, `modules`
/// (sorted by dotted name) and the derived `edges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDocument {
    pub root_path: String,
    pub roots: Vec<String>,
    pub modules: BTreeMap<String, Module>,
    pub edges: Vec<Edge>,
}

impl PackageDocument {
    /// Parse a document previously written by [`to_json`]
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl From<&Package> for PackageDocument {
    fn from(package: &Package) -> Self {
        Self {
            root_path: package.root_path.to_string_lossy().to_string(),
            roots: package.roots.clone(),
            modules: package.modules.clone(),
            edges: package.build_edges(),
        }
    }
}

/// Anything that can be viewed as a [`PackageDocument`]
pub trait AsDocument {
    fn as_document(&self) -> Cow<'_, PackageDocument>;
}

impl AsDocument for Package {
    fn as_document(&self) -> Cow<'_, PackageDocument> {
        Cow::Owned(self.to_document())
    }
}

impl AsDocument for PackageDocument {
    fn as_document(&self) -> Cow<'_, PackageDocument> {
        Cow::Borrowed(self)
    }
}

/// Render a package or document as pretty-printed JSON.
///
/// `indent` is the number of spaces per nesting level. Zero still puts
/// every element on its own line.
pub fn to_json(model: &impl AsDocument, indent: usize) -> Result<String> {
    let document = model.as_document();
    let indent = " ".repeat(indent);

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;

    String::from_utf8(buf)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

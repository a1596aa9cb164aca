use crate::error::{Error, Result};
use crate::output::{DetailLevel, DiagramGenerator, DIRECTIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "pyarch.toml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub diagram: DiagramConfig,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Spaces per level for JSON output
    pub indent: usize,
}

/// Diagram settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub detail_level: DetailLevel,
    pub include_relations: bool,
    pub include_decorators: bool,
    pub include_functions: bool,
    pub include_imports: bool,
    pub include_module_styling: bool,
    pub direction: String,
}

/// Output format
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// ASCII tree of modules, classes and functions
    #[default]
    Tree,
    /// JSON document with modules and edges
    Json,
    /// Mermaid class diagram
    Mermaid,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            indent: 2,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            detail_level: DetailLevel::default(),
            include_relations: true,
            include_decorators: false,
            include_functions: true,
            include_imports: false,
            include_module_styling: false,
            direction: "TB".to_string(),
        }
    }
}

impl DiagramConfig {
    /// Build a diagram generator with these settings
    pub fn generator(&self) -> DiagramGenerator {
        DiagramGenerator::new()
            .with_detail(self.detail_level)
            .with_relations(self.include_relations)
            .with_decorators(self.include_decorators)
            .with_functions(self.include_functions)
            .with_imports(self.include_imports)
            .with_module_styling(self.include_module_styling)
            .with_direction(&self.direction)
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        indent: Option<usize>,
        detail_level: Option<DetailLevel>,
    ) {
        if let Some(fmt) = format {
            self.output.format = fmt;
        }

        if let Some(indent) = indent {
            self.output.indent = indent;
        }

        if let Some(level) = detail_level {
            self.diagram.detail_level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !DIRECTIONS.contains(&self.diagram.direction.as_str()) {
            return Err(Error::config_validation(format!(
                "diagram direction must be one of {}, got {:?}",
                DIRECTIONS.join(", "),
                self.diagram.direction
            )));
        }

        Ok(())
    }
}

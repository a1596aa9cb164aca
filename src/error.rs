use std::path::PathBuf;
use thiserror::Error;

/// pyarch error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument {value:?}: expected one of {}", .allowed.join(", "))]
    InvalidArgument {
        value: String,
        allowed: Vec<&'static str>,
    },
}

/// Result type alias for pyarch operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a parse error for a single source file
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parser setup error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create an invalid argument error naming the accepted values
    pub fn invalid_argument(value: impl Into<String>, allowed: &[&'static str]) -> Self {
        Error::InvalidArgument {
            value: value.into(),
            allowed: allowed.to_vec(),
        }
    }
}

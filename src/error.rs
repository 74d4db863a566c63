//! Error types for lab-bootstrap

use thiserror::Error;

/// Main error type for lab-bootstrap operations
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// A required template field was not supplied (or was empty)
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<reqwest::Error> for BootstrapError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<minijinja::Error> for BootstrapError {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}

impl BootstrapError {
    /// Whether this error is a missing template parameter
    pub fn is_missing_parameter(&self) -> bool {
        matches!(self, Self::MissingParameter(_))
    }
}

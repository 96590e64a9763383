//! Error types for the linter
//!
//! Document violations are never errors: they are reported as
//! [`Problem`](crate::rules::Problem)s and traversal continues. The variants
//! here abort a run.

use thiserror::Error;

/// Result type for lint operations
pub type Result<T> = std::result::Result<T, LintError>;

/// Linter errors
#[derive(Error, Debug)]
pub enum LintError {
    /// A type definition is malformed (bug in the type tree, not the document)
    #[error("Invalid type definition: {0}")]
    SchemaDefinition(String),

    /// A rule rejected its configured options at activation time
    #[error("Invalid configuration for rule '{rule_id}': {message}")]
    Configuration { rule_id: String, message: String },

    #[error("Unable to detect OpenAPI version: {0}")]
    UnknownVersion(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl LintError {
    pub fn configuration(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

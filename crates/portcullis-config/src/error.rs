//! Configuration error types

use std::path::PathBuf;

use portcullis_abac::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to write config file at {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Resource '{resource}' is invalid: {source}")]
    InvalidResource {
        resource: String,
        source: ConfigurationError,
    },

    #[error("Rule '{rule}' is invalid: {source}")]
    InvalidRule {
        rule: String,
        source: ConfigurationError,
    },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("XDG directory error: {0}")]
    XdgError(String),
}

//! Error types for backend collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("authentication with the FPT service failed: {0}")]
    Authentication(String),

    #[error("no usable credentials: {0}")]
    MissingCredentials(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response from FPT service: {0}")]
    InvalidResponse(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {reason}")]
    ConfigParse { path: String, reason: String },

    #[error("invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("no value for key '{key}' when expanding template '{template}'")]
    MissingTemplateField { template: String, key: String },
}

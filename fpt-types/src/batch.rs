//! Per-item error values for batch operations.
//!
//! Batch calls never fail as a whole: each input index gets exactly one
//! success or one error callback. These are the values carried by the error
//! side.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classifies a per-item batch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// The reference string failed structural parsing.
    MalformedReference,
    /// An unsupported access mode was requested.
    AccessError,
    /// The reference parsed, but the record does not exist in the backend.
    ResolutionError,
}

/// A structured per-item error, delivered through a batch error callback.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct BatchElementError {
    pub code: ErrorCode,
    pub message: String,
}

impl BatchElementError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

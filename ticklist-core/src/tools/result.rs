//! Tool outputs and the tool error model

use crate::catalog::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful tool output
///
/// `text` is the caller-facing confirmation; `value` carries the structured
/// record the tool acted on, for logging and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
    #[serde(default)]
    pub value: Value,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: Value::Null,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }
}

/// Structured tool error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error kind (selects the protocol error code)
    pub kind: ToolErrorKind,

    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolError {}

impl From<CatalogError> for ToolError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::InvalidArgument(_) => ToolError::invalid_params(err.to_string()),
            CatalogError::NotFound(_) => ToolError::not_found(err.to_string()),
            CatalogError::IdsExhausted => ToolError::internal(err.to_string()),
        }
    }
}

/// Error kind taxonomy. None of these are retryable: they all describe
/// caller input or a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// A required argument was missing, mistyped or empty
    InvalidParams,

    /// The addressed record does not exist
    NotFound,

    /// Internal tool error
    Internal,
}

//! Domain error types
//!
//! This module defines the error hierarchy for the SDK. Lower layers (payload
//! normalization, validation, encryption, configuration) return these errors;
//! the flow engine converts every one of them into a failed `FlowResult` before
//! it reaches a caller of `dispatch`.

use std::fmt;
use thiserror::Error;

/// Main SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input could not be normalized into a key/value map
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// One or more declared field constraints were not met
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The remote step call returned a non-success outcome
    #[error("{phrase}: {message}")]
    RemoteStep { phrase: String, message: String },

    /// Step alias did not resolve to a step of the flow
    #[error("Invalid step: {0}")]
    UnknownStep(String),

    /// The encryption collaborator failed
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Network/connection errors while building or using the HTTP client
    #[error("Connection error: {0}")]
    Connection(String),

    /// Non-2xx response from the vendor API
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Anything else that went wrong inside a step handler
    #[error("{0}")]
    Internal(String),
}

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the payload key
    pub field: String,

    /// Human-readable description of the violation
    pub message: String,
}

impl FieldError {
    /// Creates a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collected field errors for one step request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty error list
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Returns true if no violation was recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded violations
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All recorded violations in declaration order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if the given field has at least one violation
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Converts into `Ok(())` when empty, `Err(SdkError::Validation)` otherwise
    pub fn into_result(self) -> Result<(), SdkError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(SdkError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SdkError {
    fn from(err: toml::de::Error) -> Self {
        SdkError::Configuration(format!("TOML parse error: {err}"))
    }
}

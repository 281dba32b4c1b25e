//! Error types for the esclient crates
//!
//! This module provides the structured error shared by every esclient crate,
//! together with the accumulating validation error that requests return from
//! `validate()` before anything is sent to the cluster.

use std::fmt;
use std::io;
use thiserror::Error as ThisError;

/// Severity levels for error classification
///
/// - **Warning**: the operation can proceed, the caller should be told.
/// - **Error**: the operation failed, the client stays usable.
/// - **Critical**: the client cannot keep serving requests (corrupt stream,
///   pool shut down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,
    /// Operation failed but the client can continue
    Error,
    /// The client cannot continue, requires immediate attention
    Critical,
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use esclient_common::{ErrorSeverity, EsClientError, Severity};
///
/// let error = EsClientError::decode("truncated input");
/// assert_eq!(error.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Result type alias for esclient operations
pub type Result<T> = std::result::Result<T, EsClientError>;

/// Common error type for esclient operations
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum EsClientError {
    /// The request failed validation before it was sent
    #[error("{0}")]
    Validation(#[from] ActionRequestValidationError),

    /// Malformed wire bytes or a malformed response body
    #[error("Decoding error: {message}")]
    Decode {
        /// What went wrong while decoding
        message: String,
    },

    /// A value could not be written to the wire
    #[error("Encoding error: {message}")]
    Encode {
        /// What went wrong while encoding
        message: String,
    },

    /// Structured content could not be generated from a value
    #[error("Failed to generate [{what}]: {message}")]
    Generation {
        /// Rendering of the value that failed
        what: String,
        /// The underlying failure
        message: String,
    },

    /// The transport could not deliver the request
    #[error("Transport error: {message}")]
    Transport {
        /// The underlying transport failure
        message: String,
    },

    /// The cluster answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// HTTP status code returned by the cluster
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// No executor is registered under the requested name
    #[error("No executor found for [{0}]")]
    UnknownExecutor(String),

    /// A task was submitted to an executor that no longer accepts work
    #[error("Task rejected by executor [{executor}]: {reason}")]
    Rejected {
        /// Name of the rejecting executor
        executor: String,
        /// Why the task was rejected
        reason: String,
    },

    /// A script field failed to evaluate
    #[error("Failed to execute script field [{field}]: {message}")]
    Script {
        /// Name of the script field
        field: String,
        /// The script failure
        message: String,
    },
}

impl EsClientError {
    /// Create a decoding error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Whether this error was raised before any network call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Severity for EsClientError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Decode { .. } => ErrorSeverity::Critical,
            Self::Rejected { .. } => ErrorSeverity::Critical,
            Self::Validation(_) => ErrorSeverity::Error,
            Self::Encode { .. } => ErrorSeverity::Error,
            Self::Generation { .. } => ErrorSeverity::Error,
            Self::Transport { .. } => ErrorSeverity::Error,
            Self::HttpStatus { .. } => ErrorSeverity::Error,
            Self::Io(_) => ErrorSeverity::Error,
            Self::Json(_) => ErrorSeverity::Error,
            Self::Yaml(_) => ErrorSeverity::Error,
            Self::UnknownExecutor(_) => ErrorSeverity::Error,
            Self::Script { .. } => ErrorSeverity::Warning,
        }
    }
}

/// Accumulated validation failures of a request
///
/// Requests build one of these with [`add_validation_error`] and return it from
/// `validate()`; `None` means the request is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRequestValidationError {
    errors: Vec<String>,
}

impl ActionRequestValidationError {
    /// Append a validation message
    pub fn add_validation_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// All validation messages in the order they were added
    pub fn validation_errors(&self) -> &[String] {
        &self.errors
    }

    /// Whether `message` is one of the recorded errors
    pub fn contains(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e == message)
    }
}

impl fmt::Display for ActionRequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation Failed: ")?;
        for (index, error) in self.errors.iter().enumerate() {
            write!(f, "{}: {};", index + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ActionRequestValidationError {}

/// Add `error` to an existing validation error, creating one when absent
///
/// ```rust
/// use esclient_common::add_validation_error;
///
/// let errors = add_validation_error("query is missing", None);
/// let errors = add_validation_error("index is missing", Some(errors));
/// assert_eq!(errors.to_string(), "Validation Failed: 1: query is missing;2: index is missing;");
/// ```
pub fn add_validation_error(
    error: impl Into<String>,
    existing: Option<ActionRequestValidationError>,
) -> ActionRequestValidationError {
    let mut validation = existing.unwrap_or_default();
    validation.add_validation_error(error);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_accumulates_in_order() {
        let errors = add_validation_error("first", None);
        let errors = add_validation_error("second", Some(errors));

        assert_eq!(errors.validation_errors(), &["first", "second"]);
        assert!(errors.contains("second"));
        assert!(!errors.contains("third"));
    }

    #[test]
    fn test_validation_error_converts_into_client_error() {
        let error: EsClientError = add_validation_error("query is missing", None).into();

        assert!(error.is_validation());
        assert_eq!(error.to_string(), "Validation Failed: 1: query is missing;");
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_http_status_display() {
        let error = EsClientError::HttpStatus {
            status: 404,
            body: "{\"error\":\"IndexMissingException\"}".to_string(),
        };
        assert!(error.to_string().starts_with("HTTP status 404"));
    }

    #[test]
    fn test_decode_errors_are_critical() {
        assert_eq!(
            EsClientError::decode("bad").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            EsClientError::Script {
                field: "f".to_string(),
                message: "boom".to_string()
            }
            .severity(),
            ErrorSeverity::Warning
        );
    }
}

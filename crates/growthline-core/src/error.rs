//! Error types for the growthline library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all timeline operations.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// A required input was missing or invalid
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Identity or store was not initialized before a data operation
    #[error("{component} is not ready. Please wait and try again.")]
    NotReady { component: String },

    /// The generation endpoint answered with a non-success status
    #[error("API request failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The generation endpoint answered with an unexpected envelope
    #[error("The AI returned an unexpected response: {reason}")]
    UpstreamProtocol { reason: String },

    /// The generated payload is not a valid timeline document
    #[error("Failed to parse the timeline data from AI: {source}")]
    MalformedPayload {
        #[source]
        source: serde_json::Error,
    },

    /// The request to the generation endpoint could not be completed
    #[error("Request to the generation endpoint failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    /// A store operation was attempted without a resolved owner
    #[error("User is not authenticated. Cannot access saved timelines.")]
    NotAuthenticated,

    /// Document store failures
    #[error("Store error during {operation}: {message}")]
    Store {
        operation: String,
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    /// Timeline record not found for the given ID
    #[error("Timeline with ID {id} not found")]
    RecordNotFound { id: String },

    /// The operation needs a board capability that is switched off
    #[error("The '{feature}' feature is disabled")]
    FeatureDisabled { feature: String },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating store errors with optional context.
pub struct StoreErrorBuilder {
    operation: String,
    message: String,
}

impl StoreErrorBuilder {
    /// Create a new store error builder for an operation.
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TimelineError {
        TimelineError::Store {
            operation: self.operation,
            message: self.message,
            source: Some(source),
        }
    }

    /// Build the error without an underlying source.
    pub fn build(self) -> TimelineError {
        TimelineError::Store {
            operation: self.operation,
            message: self.message,
            source: None,
        }
    }
}

/// Builder for creating input validation errors.
pub struct ValidationBuilder {
    field: String,
}

impl ValidationBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TimelineError {
        TimelineError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TimelineError {
    /// Creates a builder for store errors.
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> StoreErrorBuilder {
        StoreErrorBuilder::new(operation, message)
    }

    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationBuilder {
        ValidationBuilder::new(field)
    }

    /// Creates a readiness error for the named component.
    pub fn not_ready(component: impl Into<String>) -> Self {
        Self::NotReady {
            component: component.into(),
        }
    }

    /// Whether this error came from the document store.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store { .. })
    }

    /// Single user-facing message for a failed user action.
    ///
    /// `action` names what the user attempted, e.g. "delete timeline".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            Self::Validation { .. } | Self::NotReady { .. } | Self::NotAuthenticated => {
                self.to_string()
            }
            Self::Upstream { .. } | Self::Transport { .. } => format!(
                "An error occurred: {self}. If using your own API key, please ensure it is valid \
                 and has the Gemini API enabled. Also, check network connectivity."
            ),
            _ => format!("Failed to {action}: {self}"),
        }
    }
}

/// Specialized extension trait for store-related Results.
pub trait StoreResultExt<T> {
    /// Map rusqlite errors to a store error naming the operation.
    fn store_context(self, operation: &str, message: &str) -> Result<T>;
}

impl<T> StoreResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, operation: &str, message: &str) -> Result<T> {
        self.map_err(|e| TimelineError::store(operation, message).with_source(e))
    }
}

/// Extension trait for Result to map any error into a configuration error
/// with context.
pub trait ResultExt<T> {
    /// Add context to any error type, converting to TimelineError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| TimelineError::Configuration {
            message: format!("{context}: {e}"),
        })
    }
}

/// Result type alias for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_status_and_detail() {
        let err = TimelineError::Upstream {
            status: 403,
            message: "API key not valid".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("403"));
        assert!(text.contains("API key not valid"));
    }

    #[test]
    fn test_user_message_names_the_action_for_store_errors() {
        let err = TimelineError::store("delete", "Failed to delete document").build();
        let message = err.user_message("delete timeline");
        assert!(message.starts_with("Failed to delete timeline"));
        assert!(message.contains("delete"));
        assert!(err.is_store());
    }

    #[test]
    fn test_user_message_passes_validation_through() {
        let err = TimelineError::validation("growthGoals").with_reason("must not be empty");
        assert_eq!(
            err.user_message("generate timeline"),
            "Invalid input for field 'growthGoals': must not be empty"
        );
    }

    #[test]
    fn test_store_context_wraps_rusqlite_errors() {
        let result: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = result.store_context("query", "Failed to read").unwrap_err();
        match err {
            TimelineError::Store {
                operation, source, ..
            } => {
                assert_eq!(operation, "query");
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

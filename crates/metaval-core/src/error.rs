//! Unified error handling for metaval core.
//!
//! Wraps domain and application errors in one root type with user-actionable
//! suggestions. A subject failing its rules is not an error; see
//! [`ValidationOutcome`](crate::domain::ValidationOutcome).

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{CapabilityError, DomainError};

/// Root error type for metaval core operations.
#[derive(Debug, Error, Clone)]
pub enum CoreError {
    /// Errors from the domain layer (bad rule metadata, unknown class).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// The caller handed over something that cannot be validated.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A subject's uniqueness or new-record capability failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::InvalidArgument { message } => vec![
                format!("Rejected input: {}", message),
                "Only JSON objects can be validated".into(),
            ],
            Self::Capability(e) => vec![
                format!("The {} lookup could not complete", e.capability),
                "Check the data source backing the check and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in metaval".into(),
                "Please report this issue at: https://github.com/cosecruz/metaval/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::InvalidArgument { .. } => ErrorCategory::Validation,
            Self::Capability(_) | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::StoreLockError) | Self::Capability(_)
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_category() {
        let err = CoreError::from(DomainError::UnknownClass("User".into()));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.suggestions().iter().any(|s| s.contains("metaval rules list")));
    }

    #[test]
    fn capability_errors_are_transparent_and_retryable() {
        let err = CoreError::from(CapabilityError::new("unique", "index offline"));
        assert_eq!(err.to_string(), "unique check failed: index offline");
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn invalid_argument_message() {
        let err = CoreError::invalid_argument("expected a JSON object, got array");
        assert_eq!(
            err.to_string(),
            "Invalid argument: expected a JSON object, got array"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}

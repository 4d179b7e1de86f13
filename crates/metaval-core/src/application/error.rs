//! Application layer errors.
//!
//! These errors represent failures in orchestration, not bad metadata.
//! Metadata problems are `DomainError` from `crate::domain`.

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while orchestrating a validation.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Store access failed (lock poisoned, etc.).
    #[error("Rule store error")]
    StoreLockError,

    /// The rule metadata source could not be read.
    #[error("Rule source unavailable: {reason}")]
    MetaSourceUnavailable { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::StoreLockError => vec![
                "The rule store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::MetaSourceUnavailable { reason } => vec![
                format!("Could not read rules: {}", reason),
                "Check the rules path (--rules or rules.path in the config)".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::StoreLockError => ErrorCategory::Internal,
            Self::MetaSourceUnavailable { .. } => ErrorCategory::Configuration,
        }
    }
}

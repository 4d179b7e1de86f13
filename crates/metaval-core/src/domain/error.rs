// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Only *metadata* problems live here. A subject failing its rules is never
/// an error: it is a [`Violation`](crate::domain::Violation) in the outcome.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Rule metadata
    // ========================================================================
    #[error("invalid rule '{rule}' on property '{property}': {reason}")]
    InvalidRule {
        property: String,
        rule: String,
        reason: String,
    },

    #[error("invalid rule file: {0}")]
    InvalidRuleFile(String),

    #[error("unknown format type '{0}'")]
    UnknownFormat(String),

    // ========================================================================
    // Lookups
    // ========================================================================
    #[error("no rules registered for class '{0}'")]
    UnknownClass(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRule { rule, .. } => vec![
                format!("Check the value configured for '{}'", rule),
                match rule.as_str() {
                    "min" | "max" => "  • min/max take a number".into(),
                    "minLength" | "maxLength" => "  • minLength/maxLength take a whole number".into(),
                    "options" => "  • options is a comma-separated string".into(),
                    "pattern" => "  • pattern must be a valid regular expression".into(),
                    "unique" => "  • unique is true/false or a group property name".into(),
                    _ => "  • See documentation for supported rule values".into(),
                },
            ],
            Self::InvalidRuleFile(msg) => vec![
                "Check the syntax of your rule file".into(),
                format!("Details: {}", msg),
            ],
            Self::UnknownFormat(name) => vec![
                format!("'{}' is not a known format", name),
                "Known formats: color, number, range, url, email".into(),
            ],
            Self::UnknownClass(class) => vec![
                format!("No rule file declares class '{}'", class),
                "Try: metaval rules list".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRule { .. } | Self::InvalidRuleFile(_) | Self::UnknownFormat(_) => {
                ErrorCategory::Validation
            }
            Self::UnknownClass(_) => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

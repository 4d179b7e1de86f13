//! Application services - orchestrate use cases.

pub mod validation_service;

pub use validation_service::{ClassSummary, ValidationService};

//! Application layer for metaval.
//!
//! This layer contains:
//! - **Services**: use case orchestration (`ValidationService`)
//! - **Ports**: interface definitions for rule metadata sources
//! - **Errors**: application-specific error types
//!
//! The validation rules themselves live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{ClassSummary, ValidationService};

pub use ports::MetaSource;

pub use error::ApplicationError;

//! Application ports (traits) for external dependencies.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   `metaval-adapters`
//!   - `MetaSource`: rule metadata storage/retrieval
//!
//! The subject under validation is a domain port
//! ([`Subject`](crate::domain::Subject)) because the validator itself
//! consumes it.

pub mod output;

pub use output::MetaSource;

#[cfg(test)]
pub use output::MockMetaSource;

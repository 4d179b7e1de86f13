//! Infrastructure adapters for metaval.
//!
//! This crate implements the ports defined in `metaval-core`: rule metadata
//! loaded from TOML files, an in-memory rule store, and subjects backed by
//! JSON documents. It holds every file and serialization dependency.

pub mod meta_store;
pub mod rule_loader;
pub mod subject;

// Re-export commonly used adapters
pub use meta_store::InMemoryMetaStore;
pub use rule_loader::TomlRuleLoader;
pub use subject::{InMemoryUniqueIndex, JsonSubject};

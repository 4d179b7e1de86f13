//! Driven (output) ports - implemented by infrastructure.

use crate::domain::ClassRules;
use crate::error::CoreResult;

/// Port for rule metadata storage and retrieval.
///
/// Implemented by:
/// - `metaval_adapters::meta_store::InMemoryMetaStore` (loaded rule files)
#[cfg_attr(test, mockall::automock)]
pub trait MetaSource: Send + Sync {
    /// Rules of one class.
    ///
    /// Fails with `DomainError::UnknownClass` when nothing is registered
    /// under that name.
    fn get(&self, class: &str) -> CoreResult<ClassRules>;

    /// Names of every registered class, sorted.
    fn list(&self) -> CoreResult<Vec<String>>;

    /// Insert or replace the rules of a class.
    fn insert(&self, rules: ClassRules) -> CoreResult<()>;
}

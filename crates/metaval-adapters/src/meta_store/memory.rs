//! In-memory rule store, optionally seeded from rule files.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};

use metaval_core::{
    application::{ApplicationError, ports::MetaSource},
    domain::{ClassRules, DomainError},
    error::CoreResult,
};
use tracing::debug;

use crate::rule_loader::TomlRuleLoader;

/// Thread-safe in-memory rule store keyed by class name.
#[derive(Clone, Default)]
pub struct InMemoryMetaStore {
    inner: Arc<RwLock<HashMap<String, ClassRules>>>,
}

impl InMemoryMetaStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding every class found under `path`.
    ///
    /// `path` may be a single rule file or a directory tree; see
    /// [`TomlRuleLoader::load_all`].
    pub fn from_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let store = Self::new();
        for rules in TomlRuleLoader::new(path.as_ref()).load_all()? {
            store.insert(rules)?;
        }
        debug!(classes = store.len(), "rule store ready");
        Ok(store)
    }

    /// Get the number of classes.
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all classes.
    pub fn clear(&self) -> CoreResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.clear();
        Ok(())
    }
}

impl MetaSource for InMemoryMetaStore {
    fn get(&self, class: &str) -> CoreResult<ClassRules> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .get(class)
            .cloned()
            .ok_or_else(|| DomainError::UnknownClass(class.to_owned()).into())
    }

    fn list(&self) -> CoreResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let mut names: Vec<String> = inner.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn insert(&self, rules: ClassRules) -> CoreResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(rules.class_name().to_owned(), rules);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use metaval_core::domain::{PropertyRules, keys};
    use metaval_core::error::CoreError;

    use super::*;

    fn rules(class: &str) -> ClassRules {
        ClassRules::new(class).with_property("id", PropertyRules::new().with(keys::REQUIRED, true))
    }

    #[test]
    fn insert_then_get() {
        let store = InMemoryMetaStore::new();
        store.insert(rules("User")).unwrap();

        assert_eq!(store.get("User").unwrap().class_name(), "User");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn insert_replaces_existing_class() {
        let store = InMemoryMetaStore::new();
        store.insert(rules("User")).unwrap();
        store.insert(ClassRules::new("User")).unwrap();

        assert!(store.get("User").unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_class_is_not_found() {
        let err = InMemoryMetaStore::new().get("Ghost").unwrap_err();
        assert!(matches!(err, CoreError::Domain(DomainError::UnknownClass(c)) if c == "Ghost"));
    }

    #[test]
    fn list_is_sorted() {
        let store = InMemoryMetaStore::new();
        for class in ["Order", "Account", "User"] {
            store.insert(rules(class)).unwrap();
        }

        assert_eq!(store.list().unwrap(), vec!["Account", "Order", "User"]);
    }

    #[test]
    fn clones_share_state() {
        let store = InMemoryMetaStore::new();
        let other = store.clone();
        store.insert(rules("User")).unwrap();

        assert!(other.get("User").is_ok());
        other.clear().unwrap();
        assert!(store.is_empty());
    }
}

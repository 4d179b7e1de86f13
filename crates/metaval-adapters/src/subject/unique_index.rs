//! In-memory uniqueness index over previously stored records.

use std::sync::{Arc, RwLock};

use metaval_core::{
    domain::{CapabilityError, Subject, Value},
    error::{CoreError, CoreResult},
};
use tracing::trace;

use super::json::to_value;

/// Property identifying a stored record.
pub const ID_PROPERTY: &str = "id";

type StoredRecord = Vec<(String, Value)>;

/// Thread-safe store of existing records answering "is this value taken?".
///
/// A subject never conflicts with the stored record carrying the same `id`,
/// so re-validating a persisted record does not trip over itself.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUniqueIndex {
    inner: Arc<RwLock<Vec<StoredRecord>>>,
}

impl InMemoryUniqueIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a JSON array of objects (or a single object).
    pub fn from_json(document: serde_json::Value) -> CoreResult<Self> {
        let index = Self::new();
        match document {
            serde_json::Value::Array(items) => {
                for item in items {
                    index.insert_json(item)?;
                }
            }
            other => index.insert_json(other)?,
        }
        Ok(index)
    }

    /// Store one JSON object.
    pub fn insert_json(&self, record: serde_json::Value) -> CoreResult<()> {
        let serde_json::Value::Object(map) = record else {
            return Err(CoreError::invalid_argument(
                "stored records must be JSON objects",
            ));
        };
        self.insert(map.into_iter().map(|(k, v)| (k, to_value(v))))
    }

    /// Store one record.
    pub fn insert<K: Into<String>>(
        &self,
        record: impl IntoIterator<Item = (K, Value)>,
    ) -> CoreResult<()> {
        let record = record.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.inner
            .write()
            .map_err(|_| CoreError::Internal {
                message: "unique index lock poisoned".into(),
            })?
            .push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `subject`'s value of `property` is free.
    ///
    /// A stored record conflicts when it is a different record (by `id`), has
    /// a loosely equal value for `property`, and, when `group` is given, a
    /// loosely equal value for the `group` property too.
    pub fn is_unique(
        &self,
        subject: &dyn Subject,
        property: &str,
        group: Option<&str>,
    ) -> Result<bool, CapabilityError> {
        let Some(candidate) = subject.get(property).filter(|v| v.is_set()) else {
            return Ok(true);
        };
        let id = subject.get(ID_PROPERTY).filter(|v| v.is_set());
        let group_value = group.map(|g| subject.get(g).map(|v| v.into_owned()).unwrap_or_default());

        let records = self
            .inner
            .read()
            .map_err(|_| CapabilityError::new("unique", "index lock poisoned"))?;

        let taken = records.iter().any(|record| {
            let same_record = match (&id, field(record, ID_PROPERTY)) {
                (Some(id), Some(stored)) => stored.is_set() && id.loose_eq(stored),
                _ => false,
            };

            !same_record
                && field(record, property).is_some_and(|v| v.is_set() && v.loose_eq(&candidate))
                && match (group, &group_value) {
                    (Some(g), Some(expected)) => field(record, g)
                        .map_or(!expected.is_set(), |v| v.loose_eq(expected)),
                    _ => true,
                }
        });

        trace!(property, group, taken, "uniqueness lookup");
        Ok(!taken)
    }
}

fn field<'a>(record: &'a StoredRecord, property: &str) -> Option<&'a Value> {
    record.iter().find(|(k, _)| k == property).map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::JsonSubject;
    use metaval_core::domain::Record;
    use serde_json::json;

    fn index() -> InMemoryUniqueIndex {
        InMemoryUniqueIndex::from_json(json!([
            { "id": 1, "email": "ann@example.com", "tenant": "acme" },
            { "id": 2, "email": "bob@example.com", "tenant": "acme" },
            { "id": 3, "email": "ann@example.com", "tenant": "globex" },
            { "id": 4, "code": 7 }
        ]))
        .unwrap()
    }

    #[test]
    fn free_value_is_unique() {
        let subject = Record::new("User").set("email", "cid@example.com");
        assert!(index().is_unique(&subject, "email", None).unwrap());
    }

    #[test]
    fn taken_value_is_not_unique() {
        let subject = Record::new("User").set("email", "bob@example.com");
        assert!(!index().is_unique(&subject, "email", None).unwrap());
    }

    #[test]
    fn same_id_is_not_a_conflict() {
        let subject = Record::new("User").set("id", 2).set("email", "bob@example.com");
        assert!(index().is_unique(&subject, "email", None).unwrap());

        let numeric_text_id = Record::new("User").set("id", "2").set("email", "bob@example.com");
        assert!(index().is_unique(&numeric_text_id, "email", None).unwrap());
    }

    #[test]
    fn group_narrows_the_check() {
        let idx = index();
        let elsewhere = Record::new("User")
            .set("email", "bob@example.com")
            .set("tenant", "globex");
        assert!(idx.is_unique(&elsewhere, "email", Some("tenant")).unwrap());

        let same_tenant = Record::new("User")
            .set("email", "bob@example.com")
            .set("tenant", "acme");
        assert!(!idx.is_unique(&same_tenant, "email", Some("tenant")).unwrap());
    }

    #[test]
    fn compares_loosely() {
        let subject = Record::new("Thing").set("code", "7");
        assert!(!index().is_unique(&subject, "code", None).unwrap());
    }

    #[test]
    fn json_subject_delegates_to_index() {
        let subject = JsonSubject::new("User", json!({ "email": "ann@example.com" }))
            .unwrap()
            .with_unique_index(index());

        let check = subject.as_unique_check().unwrap();
        assert!(!check.has_unique("email", None).unwrap());
    }

    #[test]
    fn rejects_non_object_records() {
        assert!(InMemoryUniqueIndex::from_json(json!([1])).is_err());
    }

    #[test]
    fn clones_share_records() {
        let idx = InMemoryUniqueIndex::new();
        let other = idx.clone();
        idx.insert([("email", Value::from("x@y.z"))]).unwrap();
        assert_eq!(other.len(), 1);
    }
}

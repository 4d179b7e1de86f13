//! The object under validation and its optional capabilities.
//!
//! A [`Subject`] only has to expose named property reads. Uniqueness and
//! new-record checks are *capabilities*: a subject opts in by returning
//! `Some(self)` from [`Subject::as_unique_check`] / [`Subject::as_entity`].
//! The validator queries them and reports a violation when one is missing.

use std::borrow::Cow;

use thiserror::Error;

use crate::domain::value::Value;

/// Failure raised by a capability implementation (e.g. a lookup that could
/// not reach its backing store). Propagated to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{capability} check failed: {message}")]
pub struct CapabilityError {
    pub capability: &'static str,
    pub message: String,
}

impl CapabilityError {
    pub fn new(capability: &'static str, message: impl Into<String>) -> Self {
        Self {
            capability,
            message: message.into(),
        }
    }
}

/// Read access to the object being validated.
pub trait Subject {
    /// Name used in messages such as "There is already a User with this email".
    fn class_name(&self) -> &str;

    /// Current value of a property. `None` means the property is absent.
    fn get(&self, property: &str) -> Option<Cow<'_, Value>>;

    /// Whether the property is present with a non-null value.
    fn is_set(&self, property: &str) -> bool {
        self.get(property).is_some_and(|v| v.is_set())
    }

    /// Uniqueness capability, if supported.
    fn as_unique_check(&self) -> Option<&dyn UniqueCheck> {
        None
    }

    /// New-record capability, if supported.
    fn as_entity(&self) -> Option<&dyn Entity> {
        None
    }
}

/// Answers "is this property value unique?" for a subject.
pub trait UniqueCheck {
    /// `group` narrows the check to records sharing the subject's value of
    /// the named property.
    fn has_unique(&self, property: &str, group: Option<&str>) -> Result<bool, CapabilityError>;
}

/// A persisted record that knows whether it has been stored yet.
pub trait Entity {
    fn is_new(&self) -> Result<bool, CapabilityError>;
}

/// A plain property bag with no capabilities.
///
/// Handy for host code that already has its data as key/value pairs, and
/// for tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    class: String,
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            values: Vec::new(),
        }
    }

    /// Builder-style property assignment.
    pub fn set(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        let property = property.into();
        let value = value.into();
        match self.values.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.values.push((property, value)),
        }
        self
    }
}

impl Subject for Record {
    fn class_name(&self) -> &str {
        &self.class
    }

    fn get(&self, property: &str) -> Option<Cow<'_, Value>> {
        self.values
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| Cow::Borrowed(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_distinguishes_absent_null_and_empty() {
        let record = Record::new("User")
            .set("empty", "")
            .set("nothing", Value::Null);

        assert!(record.is_set("empty"));
        assert!(!record.is_set("nothing"));
        assert!(!record.is_set("missing"));
        assert!(record.get("nothing").is_some());
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn record_has_no_capabilities() {
        let record = Record::new("User");
        assert!(record.as_unique_check().is_none());
        assert!(record.as_entity().is_none());
    }

    #[test]
    fn capability_error_message() {
        let err = CapabilityError::new("unique", "index unavailable");
        assert_eq!(err.to_string(), "unique check failed: index unavailable");
    }
}

//! A JSON object as a validation subject.

use std::borrow::Cow;

use metaval_core::{
    domain::{CapabilityError, Entity, Subject, UniqueCheck, Value},
    error::{CoreError, CoreResult},
};

use super::unique_index::InMemoryUniqueIndex;

/// One JSON object exposed through the [`Subject`] port.
///
/// Scalars map onto [`Value`] directly. Nested arrays and objects have no
/// rule meaning of their own and are exposed as their compact JSON text.
///
/// Capabilities are opt-in: attach a uniqueness index with
/// [`with_unique_index`](Self::with_unique_index) and a persistence state
/// with [`with_new_record`](Self::with_new_record).
#[derive(Debug, Clone)]
pub struct JsonSubject {
    class: String,
    values: Vec<(String, Value)>,
    unique_index: Option<InMemoryUniqueIndex>,
    new_record: Option<bool>,
}

impl JsonSubject {
    /// Wrap a JSON object.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidArgument`] when `document` is not an object.
    pub fn new(class: impl Into<String>, document: serde_json::Value) -> CoreResult<Self> {
        let serde_json::Value::Object(map) = document else {
            return Err(CoreError::invalid_argument(format!(
                "expected a JSON object, got {}",
                kind_of(&document)
            )));
        };

        Ok(Self {
            class: class.into(),
            values: map
                .into_iter()
                .map(|(k, v)| (k, to_value(v)))
                .collect(),
            unique_index: None,
            new_record: None,
        })
    }

    /// Wrap a document holding either one object or an array of objects.
    pub fn from_document(class: &str, document: serde_json::Value) -> CoreResult<Vec<Self>> {
        match document {
            serde_json::Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    Self::new(class, item).map_err(|e| match e {
                        CoreError::InvalidArgument { message } => {
                            CoreError::invalid_argument(format!("item {i}: {message}"))
                        }
                        other => other,
                    })
                })
                .collect(),
            other => Ok(vec![Self::new(class, other)?]),
        }
    }

    /// Answer uniqueness queries from `index`.
    pub fn with_unique_index(mut self, index: InMemoryUniqueIndex) -> Self {
        self.unique_index = Some(index);
        self
    }

    /// Declare whether this document has been persisted before.
    pub fn with_new_record(mut self, is_new: bool) -> Self {
        self.new_record = Some(is_new);
        self
    }

    /// Property names in document order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }
}

impl Subject for JsonSubject {
    fn class_name(&self) -> &str {
        &self.class
    }

    fn get(&self, property: &str) -> Option<Cow<'_, Value>> {
        self.values
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| Cow::Borrowed(v))
    }

    fn as_unique_check(&self) -> Option<&dyn UniqueCheck> {
        self.unique_index.as_ref().map(|_| self as &dyn UniqueCheck)
    }

    fn as_entity(&self) -> Option<&dyn Entity> {
        self.new_record.map(|_| self as &dyn Entity)
    }
}

impl UniqueCheck for JsonSubject {
    fn has_unique(&self, property: &str, group: Option<&str>) -> Result<bool, CapabilityError> {
        match &self.unique_index {
            Some(index) => index.is_unique(self, property, group),
            None => Err(CapabilityError::new("unique", "no index attached")),
        }
    }
}

impl Entity for JsonSubject {
    fn is_new(&self) -> Result<bool, CapabilityError> {
        self.new_record
            .ok_or_else(|| CapabilityError::new("new-record", "persistence state not set"))
    }
}

/// Map a JSON value onto a subject value.
pub(crate) fn to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::Text(s),
        nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
            Value::Text(nested.to_string())
        }
    }
}

fn kind_of(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

//! Rule metadata: per-property directives and per-class rule sets.

use regex::Regex;

use crate::domain::{error::DomainError, value::Value};

/// Names of the directives the validator understands.
///
/// Keys are matched verbatim, so `minLength` is camel-cased exactly as it
/// appears in rule files.
pub mod keys {
    pub const REQUIRED: &str = "required";
    pub const UNIQUE: &str = "unique";
    pub const IMMUTABLE: &str = "immutable";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const OPTIONS: &str = "options";
    pub const TYPE: &str = "type";
    pub const PATTERN: &str = "pattern";
}

/// Rule directives for a single property.
///
/// A queryable bag: [`is`](Self::is) for flags, [`has`](Self::has) and
/// [`get`](Self::get) for keyed rules. Directive order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRules {
    directives: Vec<(String, Value)>,
}

impl PropertyRules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A repeated key replaces the earlier value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a directive.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.directives.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.directives.push((key, value)),
        }
    }

    /// Whether a flag directive is set to a truthy value.
    pub fn is(&self, flag: &str) -> bool {
        self.get(flag).is_some_and(Value::is_truthy)
    }

    /// Whether a keyed directive is present (a `Null` value counts as absent).
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::is_set)
    }

    /// The configured value of a directive.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.directives
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Group used for the uniqueness check: the `unique` directive's value
    /// when it is a string, `None` for a boolean flag.
    pub fn unique_group(&self) -> Option<&str> {
        self.get(keys::UNIQUE).and_then(Value::as_str)
    }

    /// Iterate over `(key, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.directives.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Check that every known directive carries a value of the right shape.
    ///
    /// Unknown directives are left alone; the validator ignores them.
    pub fn check(&self, property: &str) -> Result<(), DomainError> {
        for (key, value) in self.iter() {
            let reason = match key {
                keys::REQUIRED | keys::IMMUTABLE => {
                    (!matches!(value, Value::Bool(_))).then(|| "expected true or false".to_owned())
                }
                keys::UNIQUE => (!matches!(value, Value::Bool(_) | Value::Text(_)))
                    .then(|| "expected true/false or a group name".to_owned()),
                keys::MIN | keys::MAX => {
                    (!value.is_numeric()).then(|| format!("expected a number, got '{value}'"))
                }
                keys::MIN_LENGTH | keys::MAX_LENGTH => (!is_length(value))
                    .then(|| format!("expected a non-negative whole number, got '{value}'")),
                keys::OPTIONS | keys::TYPE => {
                    value.as_str().is_none().then(|| "expected a string".to_owned())
                }
                keys::PATTERN => match value.as_str() {
                    Some(pattern) => Regex::new(&format!("^(?:{pattern})$"))
                        .err()
                        .map(|e| format!("pattern does not compile: {e}")),
                    None => Some("expected a string".to_owned()),
                },
                _ => None,
            };

            if let Some(reason) = reason {
                return Err(DomainError::InvalidRule {
                    property: property.to_owned(),
                    rule: key.to_owned(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyRules
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rules = Self::new();
        for (k, v) in iter {
            rules.set(k, v);
        }
        rules
    }
}

fn is_length(value: &Value) -> bool {
    match value {
        Value::Int(i) => *i >= 0,
        Value::Text(s) => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// The rule metadata of one class: property name to [`PropertyRules`].
///
/// Properties enumerate in insertion order, so validation output is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRules {
    class: String,
    properties: Vec<(String, PropertyRules)>,
}

impl ClassRules {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: Vec::new(),
        }
    }

    /// Builder-style insert. A repeated property replaces the earlier rules
    /// but keeps its original position.
    pub fn with_property(mut self, name: impl Into<String>, rules: PropertyRules) -> Self {
        self.insert(name, rules);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rules: PropertyRules) {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rules,
            None => self.properties.push((name, rules)),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Rules of one property, if declared.
    pub fn property(&self, name: &str) -> Option<&PropertyRules> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Iterate over `(property, rules)` in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyRules)> {
        self.properties.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Check every property's directives. Stops at the first bad one.
    pub fn check(&self) -> Result<(), DomainError> {
        self.properties()
            .try_for_each(|(name, rules)| rules.check(name))
    }
}

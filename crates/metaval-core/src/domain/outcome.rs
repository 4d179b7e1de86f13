//! Validation outcome: structured violations and their accumulator.
//!
//! A [`Violation`] keeps the failing property and the template arguments
//! apart from the rendered text. Rendering happens in `Display`, which
//! reproduces the message wording downstream code may already match on
//! (including "should no at most").

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::domain::{rules::keys, value::Value};

/// What went wrong, with the arguments its message needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    Required,
    /// The subject cannot answer uniqueness queries.
    UniqueUnsupported { class: String },
    NotUnique { class: String },
    /// The subject cannot tell whether it is a new record.
    NotEntity { class: String },
    Immutable,
    Min { min: Value },
    Max { max: Value },
    MinLength { min: i64 },
    MaxLength { max: i64 },
    /// `options` is the rule value exactly as configured.
    Options { options: String },
    Type { type_name: String },
    Pattern,
}

impl ViolationKind {
    /// The rule directive that produced this violation.
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::Required => keys::REQUIRED,
            Self::UniqueUnsupported { .. } | Self::NotUnique { .. } => keys::UNIQUE,
            Self::NotEntity { .. } | Self::Immutable => keys::IMMUTABLE,
            Self::Min { .. } => keys::MIN,
            Self::Max { .. } => keys::MAX,
            Self::MinLength { .. } => keys::MIN_LENGTH,
            Self::MaxLength { .. } => keys::MAX_LENGTH,
            Self::Options { .. } => keys::OPTIONS,
            Self::Type { .. } => keys::TYPE,
            Self::Pattern => keys::PATTERN,
        }
    }
}

/// One failed rule on one property.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    property: String,
    kind: ViolationKind,
}

impl Violation {
    pub fn new(property: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            property: property.into(),
            kind,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn kind(&self) -> &ViolationKind {
        &self.kind
    }

    pub fn rule(&self) -> &'static str {
        self.kind.rule()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prop = &self.property;
        match &self.kind {
            ViolationKind::Required => write!(f, "{prop} is required"),
            ViolationKind::UniqueUnsupported { class } => {
                write!(f, "{class} can't check if it has a unique {prop}")
            }
            ViolationKind::NotUnique { class } => {
                write!(f, "There is already a {class} with this {prop}")
            }
            ViolationKind::NotEntity { class } => {
                write!(f, "{class} is not Entity, can't check if {prop} has changed")
            }
            ViolationKind::Immutable => write!(f, "{prop} shouldn't be modified"),
            ViolationKind::Min { min } => write!(f, "{prop} should be at least {min}"),
            ViolationKind::Max { max } => write!(f, "{prop} should no at most {max}"),
            ViolationKind::MinLength { min } => {
                write!(f, "{prop} should be at least {min} characters")
            }
            ViolationKind::MaxLength { max } => {
                write!(f, "{prop} should be at most {max} characters")
            }
            ViolationKind::Options { options } => {
                write!(f, "{prop} should be one of: {options}")
            }
            ViolationKind::Type { type_name } => write!(f, "{prop} isn't a valid {type_name}"),
            ViolationKind::Pattern => write!(f, "{prop} isn't valid"),
        }
    }
}

/// Serialised as `{ "property", "rule", "message" }`.
impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Violation", 3)?;
        state.serialize_field("property", &self.property)?;
        state.serialize_field("rule", self.rule())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Append-only accumulator of violations for one validation pass.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ValidationOutcome {
    violations: Vec<Violation>,
}

impl ValidationOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn add_error(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append all of `other`'s violations, preserving their order.
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.violations.extend(other.violations);
    }

    /// `true` when no violation was recorded.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations recorded against one property.
    pub fn for_property<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |v| v.property == property)
    }

    /// Rendered messages, in the order checks ran.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

impl IntoIterator for ValidationOutcome {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationOutcome {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(property: &str, kind: ViolationKind) -> Violation {
        Violation::new(property, kind)
    }

    #[test]
    fn renders_every_template() {
        let class = || "User".to_owned();
        let cases = [
            (v("name", ViolationKind::Required), "name is required"),
            (
                v("email", ViolationKind::UniqueUnsupported { class: class() }),
                "User can't check if it has a unique email",
            ),
            (
                v("email", ViolationKind::NotUnique { class: class() }),
                "There is already a User with this email",
            ),
            (
                v("slug", ViolationKind::NotEntity { class: class() }),
                "User is not Entity, can't check if slug has changed",
            ),
            (v("slug", ViolationKind::Immutable), "slug shouldn't be modified"),
            (
                v("age", ViolationKind::Min { min: Value::Int(18) }),
                "age should be at least 18",
            ),
            (
                v("age", ViolationKind::Max { max: Value::from("10") }),
                "age should no at most 10",
            ),
            (
                v("code", ViolationKind::MinLength { min: 5 }),
                "code should be at least 5 characters",
            ),
            (
                v("code", ViolationKind::MaxLength { max: 3 }),
                "code should be at most 3 characters",
            ),
            (
                v("size", ViolationKind::Options { options: "foo,bar, baz".into() }),
                "size should be one of: foo,bar, baz",
            ),
            (
                v("tint", ViolationKind::Type { type_name: "color".into() }),
                "tint isn't a valid color",
            ),
            (v("zip", ViolationKind::Pattern), "zip isn't valid"),
        ];

        for (violation, expected) in cases {
            assert_eq!(violation.to_string(), expected);
        }
    }

    #[test]
    fn merge_preserves_order() {
        let mut first = ValidationOutcome::new();
        first.add_error(v("a", ViolationKind::Required));

        let mut second = ValidationOutcome::new();
        second.add_error(v("b", ViolationKind::Required));
        second.add_error(v("c", ViolationKind::Pattern));

        first.merge(second);
        first.merge(ValidationOutcome::new());

        assert_eq!(
            first.messages(),
            vec!["a is required", "b is required", "c isn't valid"]
        );
    }

    #[test]
    fn empty_outcome_is_valid() {
        let outcome = ValidationOutcome::new();
        assert!(outcome.is_valid());
        assert_eq!(outcome.len(), 0);
    }

    #[test]
    fn for_property_filters() {
        let mut outcome = ValidationOutcome::new();
        outcome.add_error(v("a", ViolationKind::Pattern));
        outcome.add_error(v("b", ViolationKind::Required));
        outcome.add_error(v("a", ViolationKind::Type { type_name: "url".into() }));

        assert_eq!(outcome.for_property("a").count(), 2);
        assert_eq!(outcome.for_property("c").count(), 0);
    }

    #[test]
    fn serializes_property_rule_message() {
        let mut outcome = ValidationOutcome::new();
        outcome.add_error(v("age", ViolationKind::Min { min: Value::Int(18) }));

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "violations": [
                    { "property": "age", "rule": "min", "message": "age should be at least 18" }
                ]
            })
        );
    }
}

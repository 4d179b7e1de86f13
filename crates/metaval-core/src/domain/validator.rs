//! The validation engine.
//!
//! [`Validator`] walks the properties declared in a [`ClassRules`] and checks
//! a [`Subject`] against them:
//!
//! ```text
//! validate ─► validate_property ─► required ─► presence gate
//!                                   ─► unique ─► immutable ─► validate_basics
//!                                                              ├─ min / max
//!                                                              ├─ minLength / maxLength
//!                                                              ├─ options
//!                                                              ├─ type     (validate_type)
//!                                                              └─ pattern  (validate_pattern)
//! ```
//!
//! Rule failures are collected as [`Violation`]s; only capability failures
//! surface as `Err`.

use std::cmp::Ordering;

use regex::Regex;
use tracing::{debug, instrument, trace, warn};

use crate::domain::{
    format::Format,
    outcome::{ValidationOutcome, Violation, ViolationKind},
    rules::{ClassRules, PropertyRules, keys},
    subject::{CapabilityError, Subject},
    value::Value,
};

/// Validates subjects against the rules of one class.
#[derive(Debug, Clone)]
pub struct Validator {
    meta: ClassRules,
}

impl Validator {
    pub fn new(meta: ClassRules) -> Self {
        Self { meta }
    }

    /// The class rules this validator enforces.
    pub fn meta(&self) -> &ClassRules {
        &self.meta
    }

    /// Validate every declared property, present or not, and merge the
    /// results in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`CapabilityError`] raised by the subject's
    /// uniqueness or new-record capability.
    #[instrument(skip_all, fields(class = %self.meta.class_name()))]
    pub fn validate(&self, subject: &dyn Subject) -> Result<ValidationOutcome, CapabilityError> {
        let mut outcome = ValidationOutcome::new();

        for (property, rules) in self.meta.properties() {
            outcome.merge(self.validate_property(subject, property, rules)?);
        }

        debug!(violations = outcome.len(), "validation finished");
        Ok(outcome)
    }

    /// Validate one property.
    ///
    /// Checks run in order and stop at the first terminal condition:
    /// required, presence, uniqueness, immutability. Only when none of them
    /// stops the pass are the basic checks run.
    pub fn validate_property(
        &self,
        subject: &dyn Subject,
        property: &str,
        rules: &PropertyRules,
    ) -> Result<ValidationOutcome, CapabilityError> {
        let mut outcome = ValidationOutcome::new();
        let is_set = subject.is_set(property);

        if rules.is(keys::REQUIRED) && !is_set {
            outcome.add_error(Violation::new(property, ViolationKind::Required));
        }

        if !is_set {
            trace!(property, "not set, skipping remaining checks");
            return Ok(outcome);
        }

        if rules.is(keys::UNIQUE) {
            let group = rules.unique_group();
            let class = subject.class_name();

            match subject.as_unique_check() {
                None => {
                    outcome.add_error(Violation::new(
                        property,
                        ViolationKind::UniqueUnsupported {
                            class: class.to_owned(),
                        },
                    ));
                    return Ok(outcome);
                }
                Some(check) if !check.has_unique(property, group)? => {
                    outcome.add_error(Violation::new(
                        property,
                        ViolationKind::NotUnique {
                            class: class.to_owned(),
                        },
                    ));
                    return Ok(outcome);
                }
                Some(_) => {}
            }
        }

        if rules.is(keys::IMMUTABLE) {
            match subject.as_entity() {
                None => {
                    outcome.add_error(Violation::new(
                        property,
                        ViolationKind::NotEntity {
                            class: subject.class_name().to_owned(),
                        },
                    ));
                    return Ok(outcome);
                }
                Some(entity) if !entity.is_new()? => {
                    outcome.add_error(Violation::new(property, ViolationKind::Immutable));
                    return Ok(outcome);
                }
                Some(_) => {}
            }
        }

        outcome.merge(self.validate_basics(subject, property, rules));
        Ok(outcome)
    }

    /// Run every basic check that has a rule configured. The checks are
    /// independent: one failing does not stop the others.
    pub fn validate_basics(
        &self,
        subject: &dyn Subject,
        property: &str,
        rules: &PropertyRules,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        let value = property_value(subject, property);

        if let Some(min) = rule(rules, keys::MIN)
            && value.loose_cmp(min) == Ordering::Less
        {
            outcome.add_error(Violation::new(
                property,
                ViolationKind::Min { min: min.clone() },
            ));
        }

        if let Some(max) = rule(rules, keys::MAX)
            && value.loose_cmp(max) == Ordering::Greater
        {
            outcome.add_error(Violation::new(
                property,
                ViolationKind::Max { max: max.clone() },
            ));
        }

        let length = Value::from(value.as_text().len());

        if let Some(min) = rule(rules, keys::MIN_LENGTH)
            && length.loose_cmp(min) == Ordering::Less
        {
            outcome.add_error(Violation::new(
                property,
                ViolationKind::MinLength {
                    min: min.as_integer(),
                },
            ));
        }

        if let Some(max) = rule(rules, keys::MAX_LENGTH)
            && length.loose_cmp(max) == Ordering::Greater
        {
            outcome.add_error(Violation::new(
                property,
                ViolationKind::MaxLength {
                    max: max.as_integer(),
                },
            ));
        }

        if let Some(options) = rule(rules, keys::OPTIONS) {
            let options = options.as_text();
            let allowed = options
                .split(',')
                .map(str::trim)
                .any(|option| value.loose_eq(&Value::from(option)));

            if !allowed {
                outcome.add_error(Violation::new(
                    property,
                    ViolationKind::Options {
                        options: options.into_owned(),
                    },
                ));
            }
        }

        if let Some(type_name) = rule(rules, keys::TYPE) {
            let type_name = type_name.as_text();
            if !self.validate_type(subject, property, &type_name) {
                outcome.add_error(Violation::new(
                    property,
                    ViolationKind::Type {
                        type_name: type_name.into_owned(),
                    },
                ));
            }
        }

        if let Some(pattern) = rule(rules, keys::PATTERN)
            && !self.validate_pattern(subject, property, &pattern.as_text())
        {
            outcome.add_error(Violation::new(property, ViolationKind::Pattern));
        }

        trace!(property, violations = outcome.len(), "basic checks done");
        outcome
    }

    /// Check the property against a named format. Unknown formats never
    /// pass.
    pub fn validate_type(&self, subject: &dyn Subject, property: &str, type_name: &str) -> bool {
        match type_name.parse::<Format>() {
            Ok(format) => format.accepts(&property_value(subject, property)),
            Err(e) => {
                debug!(property, error = %e, "rejecting value of unknown type");
                false
            }
        }
    }

    /// Full-match the property's text against `pattern`.
    ///
    /// The pattern is anchored as `^(?:pattern)$`; `/` has no special
    /// meaning. A pattern that does not compile never matches.
    pub fn validate_pattern(&self, subject: &dyn Subject, property: &str, pattern: &str) -> bool {
        match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(re) => re.is_match(&property_value(subject, property).as_text()),
            Err(e) => {
                warn!(property, pattern, error = %e, "invalid pattern");
                false
            }
        }
    }
}

/// The property's value, `Null` when absent.
fn property_value(subject: &dyn Subject, property: &str) -> Value {
    subject
        .get(property)
        .map(|v| v.into_owned())
        .unwrap_or_default()
}

/// A configured, non-null rule value.
fn rule<'a>(rules: &'a PropertyRules, key: &str) -> Option<&'a Value> {
    rules.get(key).filter(|v| v.is_set())
}

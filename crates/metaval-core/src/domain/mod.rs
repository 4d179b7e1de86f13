//! Core domain layer for metaval.
//!
//! Pure validation logic: values, rule metadata, the validator and its
//! outcome types. Nothing here performs I/O. Where the data comes from and
//! how capabilities answer their questions is decided by adapters.
//!
//! ## Layout
//!
//! - **value**: the dynamic scalar and its loose comparisons
//! - **rules**: `PropertyRules` / `ClassRules` metadata
//! - **subject**: the object under validation and its optional capabilities
//! - **outcome**: structured violations and their accumulator
//! - **format**: named formats behind the `type` rule
//! - **validator**: the engine
pub mod error;
pub mod format;
pub mod outcome;
pub mod rules;
pub mod subject;
pub mod validator;
pub mod value;

pub use error::{DomainError, ErrorCategory};
pub use format::Format;
pub use outcome::{ValidationOutcome, Violation, ViolationKind};
pub use rules::{ClassRules, PropertyRules, keys};
pub use subject::{CapabilityError, Entity, Record, Subject, UniqueCheck};
pub use validator::Validator;
pub use value::{Value, parse_numeric};

#[cfg(test)]
mod tests {
    use super::*;

    fn user_rules() -> ClassRules {
        ClassRules::new("User")
            .with_property(
                "name",
                PropertyRules::new()
                    .with(keys::REQUIRED, true)
                    .with(keys::MIN_LENGTH, 2),
            )
            .with_property(
                "email",
                PropertyRules::new()
                    .with(keys::REQUIRED, true)
                    .with(keys::TYPE, "email"),
            )
            .with_property("age", PropertyRules::new().with(keys::MIN, 18))
    }

    #[test]
    fn validator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
        assert_send_sync::<ValidationOutcome>();
    }

    #[test]
    fn valid_user_passes() {
        let user = Record::new("User")
            .set("name", "Ann")
            .set("email", "ann@example.com")
            .set("age", 30);

        let outcome = Validator::new(user_rules()).validate(&user).unwrap();
        assert!(outcome.is_valid());
    }

    #[test]
    fn each_failing_property_reports_in_order() {
        let user = Record::new("User")
            .set("name", "A")
            .set("email", "not-an-email")
            .set("age", "17");

        let outcome = Validator::new(user_rules()).validate(&user).unwrap();

        assert_eq!(
            outcome.messages(),
            vec![
                "name should be at least 2 characters",
                "email isn't a valid email",
                "age should be at least 18",
            ]
        );
        let rules: Vec<_> = outcome.violations().iter().map(Violation::rule).collect();
        assert_eq!(rules, vec!["minLength", "type", "min"]);
    }

    #[test]
    fn empty_rules_accept_anything() {
        let outcome = Validator::new(ClassRules::new("Blob"))
            .validate(&Record::new("Blob").set("x", 1))
            .unwrap();
        assert!(outcome.is_empty());
    }
}

//! Validation Service - validate subjects against registered rules.
//!
//! Looks up the rules of the subject's class through a [`MetaSource`] and
//! runs the domain [`Validator`] over it.

use tracing::{debug, info, instrument};

use crate::{
    application::ports::MetaSource,
    domain::{ClassRules, Subject, ValidationOutcome, Validator},
    error::CoreResult,
};

/// Information about a registered class for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ClassSummary {
    pub name: String,
    pub properties: Vec<String>,
}

/// Service for validation use cases.
pub struct ValidationService {
    source: Box<dyn MetaSource>,
}

impl ValidationService {
    /// Create a new validation service over a metadata source.
    pub fn new(source: Box<dyn MetaSource>) -> Self {
        Self { source }
    }

    /// Build a validator for one class.
    pub fn validator_for(&self, class: &str) -> CoreResult<Validator> {
        Ok(Validator::new(self.source.get(class)?))
    }

    /// Validate a subject against the rules of its own class.
    ///
    /// Failing rules end up in the returned outcome. `Err` means the rules
    /// could not be found or a subject capability failed.
    #[instrument(skip_all, fields(class = %subject.class_name()))]
    pub fn validate(&self, subject: &dyn Subject) -> CoreResult<ValidationOutcome> {
        let validator = self.validator_for(subject.class_name())?;
        let outcome = validator.validate(subject)?;

        if outcome.is_valid() {
            debug!("subject is valid");
        } else {
            info!(violations = outcome.len(), "subject failed validation");
        }
        Ok(outcome)
    }

    /// Register rules after checking their shape.
    pub fn register(&self, rules: ClassRules) -> CoreResult<()> {
        rules.check()?;
        self.source.insert(rules)
    }

    /// List all registered classes with their declared properties.
    pub fn classes(&self) -> CoreResult<Vec<ClassSummary>> {
        self.source
            .list()?
            .into_iter()
            .map(|name| {
                let rules = self.source.get(&name)?;
                Ok(ClassSummary {
                    name,
                    properties: rules.properties().map(|(p, _)| p.to_owned()).collect(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockMetaSource;
    use crate::domain::{CapabilityError, DomainError, PropertyRules, Record, UniqueCheck, keys};
    use crate::error::CoreError;

    fn user_rules() -> ClassRules {
        ClassRules::new("User")
            .with_property("name", PropertyRules::new().with(keys::REQUIRED, true))
            .with_property("email", PropertyRules::new().with(keys::UNIQUE, true))
    }

    #[test]
    fn validate_looks_up_subject_class() {
        let mut source = MockMetaSource::new();
        source
            .expect_get()
            .withf(|class: &str| class == "User")
            .times(1)
            .returning(|_| Ok(user_rules()));

        let service = ValidationService::new(Box::new(source));
        let outcome = service.validate(&Record::new("User")).unwrap();

        assert_eq!(outcome.messages(), vec!["name is required"]);
    }

    #[test]
    fn validate_unknown_class_is_an_error() {
        let mut source = MockMetaSource::new();
        source
            .expect_get()
            .returning(|class| Err(DomainError::UnknownClass(class.to_owned()).into()));

        let service = ValidationService::new(Box::new(source));
        let err = service.validate(&Record::new("Ghost")).unwrap_err();

        assert!(matches!(
            err,
            CoreError::Domain(DomainError::UnknownClass(ref c)) if c == "Ghost"
        ));
    }

    struct Offline(Record);

    impl Subject for Offline {
        fn class_name(&self) -> &str {
            self.0.class_name()
        }

        fn get(&self, property: &str) -> Option<std::borrow::Cow<'_, crate::domain::Value>> {
            self.0.get(property)
        }

        fn as_unique_check(&self) -> Option<&dyn UniqueCheck> {
            Some(self)
        }
    }

    impl UniqueCheck for Offline {
        fn has_unique(&self, _: &str, _: Option<&str>) -> Result<bool, CapabilityError> {
            Err(CapabilityError::new("unique", "index offline"))
        }
    }

    #[test]
    fn validate_lifts_capability_failures() {
        let mut source = MockMetaSource::new();
        source.expect_get().returning(|_| Ok(user_rules()));

        let service = ValidationService::new(Box::new(source));
        let subject = Offline(Record::new("User").set("name", "Ann").set("email", "a@b.c"));

        let err = service.validate(&subject).unwrap_err();
        assert!(matches!(err, CoreError::Capability(_)));
    }

    #[test]
    fn register_rejects_malformed_rules_before_inserting() {
        let mut source = MockMetaSource::new();
        source.expect_insert().never();

        let service = ValidationService::new(Box::new(source));
        let bad = ClassRules::new("User")
            .with_property("age", PropertyRules::new().with(keys::MIN, "old"));

        let err = service.register(bad).unwrap_err();
        assert!(matches!(err, CoreError::Domain(DomainError::InvalidRule { .. })));
    }

    #[test]
    fn register_inserts_checked_rules() {
        let mut source = MockMetaSource::new();
        source
            .expect_insert()
            .withf(|rules: &ClassRules| rules.class_name() == "User")
            .times(1)
            .returning(|_| Ok(()));

        let service = ValidationService::new(Box::new(source));
        service.register(user_rules()).unwrap();
    }

    #[test]
    fn classes_lists_properties_in_order() {
        let mut source = MockMetaSource::new();
        source
            .expect_list()
            .returning(|| Ok(vec!["User".to_owned()]));
        source.expect_get().returning(|_| Ok(user_rules()));

        let service = ValidationService::new(Box::new(source));
        let classes = service.classes().unwrap();

        assert_eq!(
            classes,
            vec![ClassSummary {
                name: "User".into(),
                properties: vec!["name".into(), "email".into()],
            }]
        );
    }
}

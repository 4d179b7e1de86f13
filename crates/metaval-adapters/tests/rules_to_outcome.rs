//! Rule files and JSON documents wired through the validation service.

use std::fs;

use metaval_adapters::{InMemoryMetaStore, InMemoryUniqueIndex, JsonSubject};
use metaval_core::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const USER_RULES: &str = r#"
[class]
name = "User"

[properties.id]
immutable = true

[properties.name]
required  = true
minLength = 2
maxLength = 20

[properties.email]
required = true
unique   = "tenant"
type     = "email"

[properties.age]
min = 18
max = 130

[properties.plan]
options = "free, pro"
"#;

fn service() -> (TempDir, ValidationService) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("user.toml"), USER_RULES).unwrap();
    let store = InMemoryMetaStore::from_path(temp.path()).unwrap();
    (temp, ValidationService::new(Box::new(store)))
}

fn existing() -> InMemoryUniqueIndex {
    InMemoryUniqueIndex::from_json(json!([
        { "id": 1, "email": "ann@example.com", "tenant": "acme" }
    ]))
    .unwrap()
}

#[test]
fn new_valid_user() {
    let (_dir, service) = service();
    let subject = JsonSubject::new(
        "User",
        json!({ "name": "Bob", "email": "bob@example.com", "tenant": "acme", "age": "42", "plan": "pro" }),
    )
    .unwrap()
    .with_unique_index(existing())
    .with_new_record(true);

    assert!(service.validate(&subject).unwrap().is_valid());
}

#[test]
fn every_failure_is_reported_in_rule_file_order() {
    let (_dir, service) = service();
    let subject = JsonSubject::new(
        "User",
        json!({ "id": 9, "email": "ann@example.com", "tenant": "acme", "age": 15, "plan": "gold" }),
    )
    .unwrap()
    .with_unique_index(existing())
    .with_new_record(false);

    let outcome = service.validate(&subject).unwrap();

    assert_eq!(
        outcome.messages(),
        vec![
            "id shouldn't be modified",
            "name is required",
            "There is already a User with this email",
            "age should be at least 18",
            "plan should be one of: free, pro",
        ]
    );
}

#[test]
fn missing_capabilities_are_violations() {
    let (_dir, service) = service();
    let subject = JsonSubject::new(
        "User",
        json!({ "id": 1, "name": "Ann", "email": "ann@example.com" }),
    )
    .unwrap();

    let outcome = service.validate(&subject).unwrap();

    assert_eq!(
        outcome.messages(),
        vec![
            "User is not Entity, can't check if id has changed",
            "User can't check if it has a unique email",
        ]
    );
}

#[test]
fn persisted_record_does_not_conflict_with_itself() {
    let (_dir, service) = service();
    let subject = JsonSubject::new(
        "User",
        json!({ "id": 1, "name": "Ann", "email": "ann@example.com", "tenant": "acme" }),
    )
    .unwrap()
    .with_unique_index(existing())
    .with_new_record(false);

    assert_eq!(
        service.validate(&subject).unwrap().messages(),
        vec!["id shouldn't be modified"]
    );
}

#[test]
fn outcome_serializes_as_records() {
    let (_dir, service) = service();
    let subject = JsonSubject::new("User", json!({ "name": "A", "email": "x@y.z" })).unwrap();

    let outcome = service.validate(&subject).unwrap();
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        json["violations"][0],
        json!({ "property": "name", "rule": "minLength", "message": "name should be at least 2 characters" })
    );
}

//! metaval Core - metadata-driven property validation.
//!
//! This crate provides the domain and application layers of metaval,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           metaval-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │          (ValidationService)            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │             (MetaSource)                │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    metaval-adapters (Infrastructure)    │
//! │  (InMemoryMetaStore, JsonSubject, ...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Validator, ClassRules, Subject, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use metaval_core::prelude::*;
//!
//! let rules = ClassRules::new("User")
//!     .with_property("email", PropertyRules::new().with("required", true).with("type", "email"));
//!
//! let user = Record::new("User").set("email", "not-an-email");
//! let outcome = Validator::new(rules).validate(&user).unwrap();
//!
//! assert_eq!(outcome.messages(), vec!["email isn't a valid email"]);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{ClassSummary, MetaSource, ValidationService};
    pub use crate::domain::{
        CapabilityError, ClassRules, Entity, PropertyRules, Record, Subject, UniqueCheck,
        ValidationOutcome, Validator, Value, Violation, ViolationKind,
    };
    pub use crate::error::{CoreError, CoreResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # reqbind-validation
//!
//! Validation of bound targets.
//!
//! Mappers only depend on the `Validator` trait, which turns a target into an
//! ordered list of `ConstraintViolation`s carrying dotted property paths. The
//! `RecursiveValidator` is the default implementation: it reads per-class
//! constraint metadata, cascades into nested objects and collections, and
//! renders messages through an optional `Translator`.
//!
//! ## Example Usage
//!
//! ```rust
//! use reqbind_validation::{ClassMetadata, Constraint, Validator, ValidatorBuilder};
//! use reqbind_value::{Object, Value};
//!
//! let validator = ValidatorBuilder::new()
//!     .add_class_metadata(
//!         ClassMetadata::new("User").add_property_constraint("name", Constraint::not_blank()),
//!     )
//!     .build();
//!
//! let user = Value::from(Object::new("User").with_property("name", ""));
//! let violations = validator.validate(&user);
//!
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations.get(0).unwrap().property_path(), "name");
//! ```

pub mod constraints;
pub mod context;
pub mod engine;
pub mod metadata;
pub mod translator;
pub mod violation;

pub use constraints::{CallbackFn, Constraint};
pub use context::{ExecutionContext, ViolationBuilder};
pub use engine::{RecursiveValidator, Validator, ValidatorBuilder};
pub use metadata::{ClassMetadata, MetadataRegistry};
pub use translator::{MessageCatalog, Parameters, Translator, render_message};
pub use violation::{ConstraintViolation, ConstraintViolationList};

use thiserror::Error;

/// Default translation domain for validation messages
pub const DEFAULT_DOMAIN: &str = "validators";

/// Errors that can occur while configuring validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid constraint: {0}")]
    Constraint(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

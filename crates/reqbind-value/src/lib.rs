#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # reqbind-value
//!
//! Dynamic value graph used as the binding target of request mappers.
//!
//! This crate provides a format-neutral value model (`Value`), shared mutable
//! objects with per-property access rules (`Object`, `ObjectRef`), dotted
//! property paths and a structural `PropertyAccessor` able to read and write
//! through them.

/// Structural read/write access along property paths.
pub mod accessor;
/// Uploaded file descriptors.
pub mod file;
/// Camel/snake case conversion of field names.
pub mod naming;
/// Shared objects with typed property slots.
pub mod object;
/// Property path parsing.
pub mod path;
/// Core value enum and map helpers.
pub mod value;

pub use accessor::{GraphPropertyAccessor, PropertyAccessor};
pub use file::UploadedFile;
pub use naming::{camelize, snake_case};
pub use object::{Object, ObjectRef, Property, PropertySetter};
pub use path::{PathElement, PropertyPath};
pub use value::{Value, ValueMap, replace_recursive};

use thiserror::Error;

/// Errors raised while resolving or writing property paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Can't get a way to read the property \"{property}\" in class \"{class}\" (path: {path})")]
    NoSuchProperty {
        path: String,
        class: String,
        property: String,
    },

    #[error("The property \"{path}\" is not readable")]
    NotReadable { path: String },

    #[error("The property \"{path}\" is not writable")]
    NotWritable { path: String },

    #[error("The property \"{path}\" is not initialized. You should initialize it before accessing it")]
    Uninitialized { path: String },

    #[error("Unexpected type at \"{path}\": expected {expected}, found {found}")]
    UnexpectedType {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Invalid property path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Index {index} is out of bounds at \"{path}\"")]
    IndexOutOfBounds { path: String, index: String },

    #[error("Transformation failed at \"{path}\": {message}")]
    TransformationFailed { path: String, message: String },
}

impl Error {
    /// Build a missing-property error.
    pub fn no_such_property(
        path: impl Into<String>,
        class: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self::NoSuchProperty {
            path: path.into(),
            class: class.into(),
            property: property.into(),
        }
    }

    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an unexpected-type error.
    pub fn unexpected_type(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedType {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a transformation failure raised by a property setter.
    pub fn transformation_failed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransformationFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the failure only means the target slot was never initialized.
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized { .. })
    }

    /// Whether the failure comes from a value transformation in a setter.
    #[must_use]
    pub fn is_transformation_failure(&self) -> bool {
        matches!(self, Self::TransformationFailed { .. })
    }
}

/// Crate-local result type for value operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = Error::Uninitialized {
            path: "foo".to_string(),
        };
        assert!(err.is_uninitialized());
        assert!(!err.is_transformation_failure());

        let err = Error::transformation_failed("bar", "Cannot transform");
        assert!(err.is_transformation_failure());
        assert!(!err.is_uninitialized());
        assert_eq!(
            err.to_string(),
            "Transformation failed at \"bar\": Cannot transform"
        );
    }
}

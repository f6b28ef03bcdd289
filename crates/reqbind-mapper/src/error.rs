//! Mapping and access errors

use crate::result::MappingResult;
use thiserror::Error;

/// Message carried by every mapping error
pub const INVALID_DATA: &str = "Invalid data.";

/// Request data was rejected.
///
/// The only user-facing failure of a mapper; the result tree holds every
/// problem found during the call.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct MappingError {
    result: MappingResult,
    message: String,
}

impl MappingError {
    pub fn new(result: MappingResult) -> Self {
        Self {
            result,
            message: INVALID_DATA.to_string(),
        }
    }

    #[must_use]
    pub fn result(&self) -> &MappingResult {
        &self.result
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn into_result(self) -> MappingResult {
        self.result
    }
}

/// No accessor can read or write a field
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("Unable to read from the given form data as no getter is defined.")]
    NoGetter,

    #[error("Unable to write the given value as no setter is defined.")]
    NoSetter,

    #[error("Unable to read from the given form data as no property path is defined.")]
    NoReadablePath,

    #[error("Unable to write the given value as no property path is defined.")]
    NoWritablePath,

    #[error(
        "Unable to read from the given form data as no accessor in the chain is able to read the data."
    )]
    NoReadableAccessor,

    #[error(
        "Unable to write the given value as no accessor in the chain is able to set the data."
    )]
    NoWritableAccessor,
}

/// A data transformer could not convert a submitted value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransformationFailed(pub String);

impl TransformationFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

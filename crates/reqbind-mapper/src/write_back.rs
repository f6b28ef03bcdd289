//! Field write-back

use crate::accessor::DataAccessor;
use crate::registry::FieldRegistry;
use crate::{Error, Result};
use reqbind_value::{Value, ValueMap};
use tracing::debug;

/// What happened while writing extracted data into a target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Submitted keys without a declared field, in request order
    pub extra: Vec<String>,
    /// Fields whose value could not be transformed, with their message
    pub invalid: Vec<(String, String)>,
}

impl WriteOutcome {
    #[must_use]
    pub fn has_extra(&self) -> bool {
        !self.extra.is_empty()
    }
}

/// Write every declared key of `data` into `target`.
///
/// Undeclared keys are collected as extra. Declared fields that are
/// disabled, unmapped or not writable are skipped. A value rejected by the
/// field's transformer or by a setter marks the field invalid and the
/// remaining fields are still written.
///
/// # Errors
///
/// Access errors and structural failures other than transformation
/// failures are returned as they are.
pub fn write_fields(
    target: &mut Value,
    data: ValueMap,
    registry: &FieldRegistry,
    accessor: &dyn DataAccessor,
    invalid_message: &str,
) -> Result<WriteOutcome> {
    let mut outcome = WriteOutcome::default();

    for (key, submitted) in data {
        let Some(field) = registry.get(&key) else {
            outcome.extra.push(key);
            continue;
        };

        if field.is_disabled() || !field.is_mapped() {
            debug!(field = %key, "Skipping disabled or unmapped field");
            continue;
        }

        if !accessor.is_writable(target, field) {
            debug!(field = %key, "Skipping non-writable field");
            continue;
        }

        let message = field.invalid_message().unwrap_or(invalid_message);
        let value = match field.transformer() {
            Some(transformer) => match transformer.reverse_transform(submitted) {
                Ok(value) => value,
                Err(err) => {
                    debug!(field = %key, error = %err, "Field value could not be transformed");
                    outcome.invalid.push((key, message.to_string()));
                    continue;
                }
            },
            None => submitted,
        };

        match accessor.set_value(target, value, field) {
            Ok(()) => {}
            Err(Error::Property(err)) if err.is_transformation_failure() => {
                debug!(field = %key, error = %err, "Field setter rejected the value");
                outcome.invalid.push((key, message.to_string()));
            }
            Err(err) => return Err(err),
        }
    }

    if outcome.has_extra() {
        debug!(extra = ?outcome.extra, "Request carries undeclared fields");
    }

    Ok(outcome)
}

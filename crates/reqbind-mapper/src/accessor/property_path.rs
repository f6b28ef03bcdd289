use super::DataAccessor;
use crate::error::AccessError;
use crate::field::Field;
use crate::Result;
use reqbind_value::{GraphPropertyAccessor, PropertyAccessor, PropertyPath, Value};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Accesses fields through their property path
#[derive(Clone)]
pub struct PropertyPathAccessor {
    property_accessor: Rc<dyn PropertyAccessor>,
}

impl PropertyPathAccessor {
    pub fn new(property_accessor: Rc<dyn PropertyAccessor>) -> Self {
        Self { property_accessor }
    }

    /// Value at `path`; an uninitialized property reads as null
    fn property_value(&self, data: &Value, path: &PropertyPath) -> Result<Value> {
        match self.property_accessor.get_value(data, path) {
            Ok(value) => Ok(value),
            Err(err) if err.is_uninitialized() => Ok(Value::Null),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether writing `value` can be skipped because the target already
    /// holds it
    fn holds_already(
        &self,
        data: &Value,
        path: &PropertyPath,
        value: &Value,
        field: &Field,
    ) -> Result<bool> {
        let by_reference = field.is_by_reference() && matches!(data, Value::Object(_));
        if !by_reference && !matches!(value, Value::DateTime(_)) {
            return Ok(false);
        }

        let current = self.property_value(data, path)?;

        if let (Value::DateTime(new), Value::DateTime(old)) = (value, &current) {
            if new == old {
                return Ok(true);
            }
        }

        Ok(by_reference && value.is_identical(&current))
    }
}

impl Default for PropertyPathAccessor {
    fn default() -> Self {
        Self::new(Rc::new(GraphPropertyAccessor::new()))
    }
}

impl fmt::Debug for PropertyPathAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyPathAccessor").finish_non_exhaustive()
    }
}

impl DataAccessor for PropertyPathAccessor {
    fn get_value(&self, data: &Value, field: &Field) -> Result<Value> {
        let path = field.property_path().ok_or(AccessError::NoReadablePath)?;
        self.property_value(data, path)
    }

    fn set_value(&self, data: &mut Value, value: Value, field: &Field) -> Result<()> {
        let path = field.property_path().ok_or(AccessError::NoWritablePath)?;

        if self.holds_already(data, path, &value, field)? {
            trace!(field = field.name(), "Value already held, skipping write");
            return Ok(());
        }

        self.property_accessor.set_value(data, path, value)?;
        Ok(())
    }

    fn is_readable(&self, _data: &Value, field: &Field) -> bool {
        field.property_path().is_some()
    }

    fn is_writable(&self, data: &Value, field: &Field) -> bool {
        field
            .property_path()
            .is_some_and(|path| self.property_accessor.is_writable(data, path))
    }
}

use super::DataAccessor;
use crate::error::AccessError;
use crate::field::Field;
use crate::Result;
use reqbind_value::Value;

/// Accesses fields through their getter and setter callbacks
#[derive(Debug, Clone, Copy, Default)]
pub struct CallbackAccessor;

impl CallbackAccessor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DataAccessor for CallbackAccessor {
    fn get_value(&self, data: &Value, field: &Field) -> Result<Value> {
        let getter = field.getter().ok_or(AccessError::NoGetter)?;
        Ok(getter(data, field)?)
    }

    fn set_value(&self, data: &mut Value, value: Value, field: &Field) -> Result<()> {
        let setter = field.setter().ok_or(AccessError::NoSetter)?;
        setter(data, value, field)?;
        Ok(())
    }

    fn is_readable(&self, _data: &Value, field: &Field) -> bool {
        field.getter().is_some()
    }

    fn is_writable(&self, _data: &Value, field: &Field) -> bool {
        field.setter().is_some()
    }
}

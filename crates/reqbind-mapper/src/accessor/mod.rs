//! Field accessors
//!
//! A `DataAccessor` reads and writes one declared field of a target. The
//! mapper writes through a `ChainAccessor` of a `CallbackAccessor` (fields
//! with getter/setter callbacks) and a `PropertyPathAccessor` (fields mapped
//! onto a property path) unless another accessor is injected.

mod callback;
mod chain;
mod property_path;

pub use callback::CallbackAccessor;
pub use chain::ChainAccessor;
pub use property_path::PropertyPathAccessor;

use crate::Result;
use crate::field::Field;
use reqbind_value::Value;

/// Reads and writes a field of a target
pub trait DataAccessor {
    /// Read the field.
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` when this accessor cannot read the field.
    fn get_value(&self, data: &Value, field: &Field) -> Result<Value>;

    /// Write `value` into the field.
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` when this accessor cannot write the field, or
    /// `Error::Property` when the write itself fails.
    fn set_value(&self, data: &mut Value, value: Value, field: &Field) -> Result<()>;

    /// Whether `get_value` is supported for the field
    fn is_readable(&self, data: &Value, field: &Field) -> bool;

    /// Whether `set_value` is supported for the field
    fn is_writable(&self, data: &Value, field: &Field) -> bool;
}

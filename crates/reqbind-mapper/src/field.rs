//! Declared fields

use crate::transformer::DataTransformer;
use reqbind_value::{PropertyPath, Value};
use std::fmt;
use std::rc::Rc;

/// Message for values that could not be transformed, unless the field or
/// the mapper configuration overrides it
pub const DEFAULT_INVALID_MESSAGE: &str = "This value is not valid.";

/// Reads a field from the target
pub type Getter = Rc<dyn Fn(&Value, &Field) -> reqbind_value::Result<Value>>;

/// Writes a submitted value into the target
pub type Setter = Rc<dyn Fn(&mut Value, Value, &Field) -> reqbind_value::Result<()>>;

/// A field the mapper is allowed to write, with its access options.
///
/// By default a field maps onto the target property of the same name,
/// honors reference identity, is mapped and enabled.
#[derive(Clone)]
pub struct Field {
    name: String,
    property_path: Option<PropertyPath>,
    getter: Option<Getter>,
    setter: Option<Setter>,
    by_reference: bool,
    mapped: bool,
    disabled: bool,
    transformer: Option<Rc<dyn DataTransformer>>,
    invalid_message: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            property_path: Some(PropertyPath::property(name.clone())),
            name,
            getter: None,
            setter: None,
            by_reference: true,
            mapped: true,
            disabled: false,
            transformer: None,
            invalid_message: None,
        }
    }

    /// Map the field onto another location of the target
    #[must_use]
    pub fn with_property_path(mut self, path: PropertyPath) -> Self {
        self.property_path = Some(path);
        self
    }

    /// Detach the field from any structural location
    #[must_use]
    pub fn without_property_path(mut self) -> Self {
        self.property_path = None;
        self
    }

    #[must_use]
    pub fn with_getter(
        mut self,
        getter: impl Fn(&Value, &Field) -> reqbind_value::Result<Value> + 'static,
    ) -> Self {
        self.getter = Some(Rc::new(getter));
        self
    }

    #[must_use]
    pub fn with_setter(
        mut self,
        setter: impl Fn(&mut Value, Value, &Field) -> reqbind_value::Result<()> + 'static,
    ) -> Self {
        self.setter = Some(Rc::new(setter));
        self
    }

    #[must_use]
    pub fn by_reference(mut self, by_reference: bool) -> Self {
        self.by_reference = by_reference;
        self
    }

    #[must_use]
    pub fn mapped(mut self, mapped: bool) -> Self {
        self.mapped = mapped;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn with_transformer(mut self, transformer: impl DataTransformer + 'static) -> Self {
        self.transformer = Some(Rc::new(transformer));
        self
    }

    #[must_use]
    pub fn with_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn property_path(&self) -> Option<&PropertyPath> {
        self.property_path.as_ref()
    }

    #[must_use]
    pub fn getter(&self) -> Option<&Getter> {
        self.getter.as_ref()
    }

    #[must_use]
    pub fn setter(&self) -> Option<&Setter> {
        self.setter.as_ref()
    }

    #[must_use]
    pub fn is_by_reference(&self) -> bool {
        self.by_reference
    }

    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn transformer(&self) -> Option<&dyn DataTransformer> {
        self.transformer.as_deref()
    }

    /// Message reported when the submitted value cannot be transformed
    #[must_use]
    pub fn invalid_message(&self) -> Option<&str> {
        self.invalid_message.as_deref()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field(
                "property_path",
                &self.property_path.as_ref().map(ToString::to_string),
            )
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .field("by_reference", &self.by_reference)
            .field("mapped", &self.mapped)
            .field("disabled", &self.disabled)
            .field("transformer", &self.transformer.is_some())
            .finish()
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

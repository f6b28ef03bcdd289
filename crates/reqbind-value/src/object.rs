//! Shared objects with typed property slots
//!
//! An `Object` is the mutable, reference-typed node of a target graph. Each
//! property carries its own access rules: it may be uninitialized, read-only,
//! write-only, or routed through a setter that transforms (or rejects) the
//! incoming value.

use crate::naming::camelize;
use crate::value::Value;
use indexmap::IndexMap;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Setter hook: receives the incoming value and returns the value to store,
/// or a transformation failure message.
pub type PropertySetter = Rc<dyn Fn(Value) -> std::result::Result<Value, String>>;

/// A property slot of an object
#[derive(Clone)]
pub struct Property {
    value: Option<Value>,
    readable: bool,
    writable: bool,
    setter: Option<PropertySetter>,
}

impl Property {
    /// Readable and writable property holding `value`
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            readable: true,
            writable: true,
            setter: None,
        }
    }

    /// Readable and writable property without a value yet
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            value: None,
            readable: true,
            writable: true,
            setter: None,
        }
    }

    /// Mark the property as read-only
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Mark the property as write-only
    #[must_use]
    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Route writes through a setter
    #[must_use]
    pub fn with_setter(
        mut self,
        setter: impl Fn(Value) -> std::result::Result<Value, String> + 'static,
    ) -> Self {
        self.setter = Some(Rc::new(setter));
        self
    }

    /// Current value, `None` when uninitialized
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Whether a value has been assigned
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.value.is_some()
    }

    /// Whether the property can be read from outside
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Whether the property can be written from outside
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Store a value, applying the setter if any.
    ///
    /// # Errors
    ///
    /// Returns the setter's failure message when it rejects the value.
    pub fn write(&mut self, value: Value) -> std::result::Result<(), String> {
        let stored = match &self.setter {
            Some(setter) => setter(value)?,
            None => value,
        };
        self.value = Some(stored);
        Ok(())
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.value)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("has_setter", &self.setter.is_some())
            .finish()
    }
}

/// An object of a named class with ordered properties
#[derive(Debug, Clone)]
pub struct Object {
    class: String,
    properties: IndexMap<String, Property>,
}

impl Object {
    /// Create an empty object of the given class
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: IndexMap::new(),
        }
    }

    /// Add a public property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), Property::new(value));
        self
    }

    /// Add a property slot with custom access rules
    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>, property: Property) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// Add an uninitialized public property
    #[must_use]
    pub fn with_uninitialized(mut self, name: impl Into<String>) -> Self {
        self.properties.insert(name.into(), Property::uninitialized());
        self
    }

    /// Class name
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Iterate properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Property by exact name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Mutable property by exact name
    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.get_mut(name)
    }

    /// Resolve a requested name to a declared property name.
    ///
    /// The exact name wins; otherwise the camel form of the name is tried, so
    /// `private_bar` resolves to a `privateBar` property.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        if self.properties.contains_key(name) {
            return Some(name.to_string());
        }

        let camel = camelize(name);
        self.properties.contains_key(&camel).then_some(camel)
    }

    /// Initialized value of a property, bypassing access rules
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.properties.get(name).and_then(Property::value)
    }

    /// Assign a property, bypassing access rules and setters.
    ///
    /// Creates a public property when none exists.
    pub fn set_raw(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.properties.get_mut(&name) {
            Some(property) => property.value = Some(value),
            None => {
                self.properties.insert(name, Property::new(value));
            }
        }
    }
}

/// Shared handle to an object; clones alias the same object
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// Wrap an object into a shared handle
    #[must_use]
    pub fn new(object: Object) -> Self {
        Self(Rc::new(RefCell::new(object)))
    }

    /// Borrow the object
    ///
    /// # Panics
    ///
    /// Panics if the object is currently mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Object> {
        self.0.borrow()
    }

    /// Mutably borrow the object
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Object> {
        self.0.borrow_mut()
    }

    /// Whether both handles point to the same object
    #[must_use]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared allocation, stable for the object's lifetime
    #[must_use]
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Class name of the object
    #[must_use]
    pub fn class(&self) -> String {
        self.0.borrow().class().to_string()
    }

    /// Clone of an initialized property value, bypassing access rules
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get_raw(name).cloned()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(f, "ObjectRef({}@{:#x})", object.class(), self.addr()),
            Err(_) => write!(f, "ObjectRef(<borrowed>@{:#x})", self.addr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_name_prefers_exact_then_camel() {
        let object = Object::new("Foo")
            .with_property("foobar", "x")
            .with_property("privateBar", "y")
            .with_property("snake_name", "z");

        assert_eq!(object.resolve_name("foobar").as_deref(), Some("foobar"));
        assert_eq!(object.resolve_name("private_bar").as_deref(), Some("privateBar"));
        assert_eq!(object.resolve_name("snake_name").as_deref(), Some("snake_name"));
        assert_eq!(object.resolve_name("missing"), None);
    }

    #[test]
    fn test_setter_transforms_and_rejects() {
        let mut upper = Property::new("").with_setter(|v| match v {
            Value::String(s) => Ok(Value::String(s.to_uppercase())),
            other => Err(format!("expected string, got {}", other.type_name())),
        });

        upper.write(Value::from("abc")).unwrap();
        assert_eq!(upper.value(), Some(&Value::from("ABC")));

        let err = upper.write(Value::Integer(1)).unwrap_err();
        assert_eq!(err, "expected string, got int");
        assert_eq!(upper.value(), Some(&Value::from("ABC")));
    }

    #[test]
    fn test_clones_alias_the_same_object() {
        let a = ObjectRef::new(Object::new("Foo").with_property("n", 1));
        let b = a.clone();

        b.borrow_mut().set_raw("n", 2);
        assert_eq!(a.get("n"), Some(Value::Integer(2)));
        assert!(a.ptr_eq(&b));
        assert_eq!(a.class(), "Foo");
    }

    #[test]
    fn test_uninitialized_property() {
        let object = Object::new("Foo").with_uninitialized("later");
        let property = object.property("later").unwrap();
        assert!(!property.is_initialized());
        assert!(object.get_raw("later").is_none());
    }
}

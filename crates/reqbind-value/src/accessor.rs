//! Structural property access
//!
//! `PropertyAccessor` reads and writes values along a `PropertyPath`.
//! `GraphPropertyAccessor` is the default implementation over `Value` graphs:
//! object properties honor their access rules and setters, maps and lists are
//! indexed by key.

use crate::object::ObjectRef;
use crate::path::{PathElement, PropertyPath};
use crate::value::{Value, ValueMap};
use crate::{Error, Result};
use tracing::trace;

/// Reads and writes values at property paths of a container
pub trait PropertyAccessor {
    /// Read the value at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the path cannot be resolved or a property on the
    /// way is missing, unreadable or uninitialized.
    fn get_value(&self, data: &Value, path: &PropertyPath) -> Result<Value>;

    /// Write `value` at `path`, creating intermediate maps where needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the location is not writable, or
    /// `Error::TransformationFailed` when a property setter rejects the value.
    fn set_value(&self, data: &mut Value, path: &PropertyPath, value: Value) -> Result<()>;

    /// Whether `get_value` can succeed for `path`
    fn is_readable(&self, data: &Value, path: &PropertyPath) -> bool;

    /// Whether `set_value` can write at `path`
    fn is_writable(&self, data: &Value, path: &PropertyPath) -> bool;
}

/// Property accessor over `Value` graphs
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphPropertyAccessor;

impl GraphPropertyAccessor {
    /// Create a new accessor
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn read_element(container: &Value, element: &PathElement, path: &str) -> Result<Value> {
        match container {
            Value::Object(object) => Self::read_property(object, element.key(), path),
            Value::Map(map) => Ok(map.get(element.key()).cloned().unwrap_or(Value::Null)),
            Value::List(items) => Ok(element
                .key()
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index).cloned())
                .unwrap_or(Value::Null)),
            other => Err(Error::unexpected_type(
                path,
                "object, map or list",
                other.type_name(),
            )),
        }
    }

    fn read_property(object: &ObjectRef, name: &str, path: &str) -> Result<Value> {
        let object = object.borrow();
        let resolved = object
            .resolve_name(name)
            .ok_or_else(|| Error::no_such_property(path, object.class(), name))?;
        let property = object
            .property(&resolved)
            .ok_or_else(|| Error::no_such_property(path, object.class(), name))?;

        if !property.is_readable() {
            return Err(Error::NotReadable {
                path: path.to_string(),
            });
        }

        property.value().cloned().ok_or_else(|| Error::Uninitialized {
            path: path.to_string(),
        })
    }

    fn write_element(
        container: &mut Value,
        element: &PathElement,
        value: Value,
        path: &str,
    ) -> Result<()> {
        match container {
            Value::Object(object) => {
                let mut object = object.borrow_mut();
                let resolved = object
                    .resolve_name(element.key())
                    .ok_or_else(|| Error::no_such_property(path, object.class(), element.key()))?;
                let property = object
                    .property_mut(&resolved)
                    .ok_or_else(|| Error::NotWritable {
                        path: path.to_string(),
                    })?;

                if !property.is_writable() {
                    return Err(Error::NotWritable {
                        path: path.to_string(),
                    });
                }

                property
                    .write(value)
                    .map_err(|message| Error::transformation_failed(path, message))
            }
            Value::Map(map) => {
                map.insert(element.key().to_string(), value);
                Ok(())
            }
            Value::List(items) => {
                let index = element
                    .key()
                    .parse::<usize>()
                    .map_err(|_| Error::IndexOutOfBounds {
                        path: path.to_string(),
                        index: element.key().to_string(),
                    })?;
                if index < items.len() {
                    items[index] = value;
                } else if index == items.len() {
                    items.push(value);
                } else {
                    return Err(Error::IndexOutOfBounds {
                        path: path.to_string(),
                        index: element.key().to_string(),
                    });
                }
                Ok(())
            }
            Value::Null => {
                let mut map = ValueMap::new();
                map.insert(element.key().to_string(), value);
                *container = Value::Map(map);
                Ok(())
            }
            other => Err(Error::unexpected_type(
                path,
                "object, map or list",
                other.type_name(),
            )),
        }
    }

    fn write_at(
        &self,
        container: &mut Value,
        path: &PropertyPath,
        depth: usize,
        value: Value,
    ) -> Result<()> {
        let element = &path.elements()[depth];
        let location = path.prefix_string(depth + 1);

        if depth + 1 == path.len() {
            return Self::write_element(container, element, value, &location);
        }

        let mut child = match Self::read_element(container, element, &location) {
            Ok(child) => child,
            Err(err) if err.is_uninitialized() => Value::Null,
            Err(err) => return Err(err),
        };
        self.write_at(&mut child, path, depth + 1, value)?;

        // Objects are shared, so writes through them are already visible.
        if matches!(child, Value::Object(_)) {
            return Ok(());
        }
        trace!(path = %location, "Writing back value-typed intermediate");
        Self::write_element(container, element, child, &location)
    }
}

impl PropertyAccessor for GraphPropertyAccessor {
    fn get_value(&self, data: &Value, path: &PropertyPath) -> Result<Value> {
        let mut current = data.clone();
        for (depth, element) in path.elements().iter().enumerate() {
            current = Self::read_element(&current, element, &path.prefix_string(depth + 1))?;
        }
        Ok(current)
    }

    fn set_value(&self, data: &mut Value, path: &PropertyPath, value: Value) -> Result<()> {
        if path.is_empty() {
            return Err(Error::invalid_path("", "path is empty"));
        }
        self.write_at(data, path, 0, value)
    }

    fn is_readable(&self, data: &Value, path: &PropertyPath) -> bool {
        match self.get_value(data, path) {
            Ok(_) => true,
            Err(err) => err.is_uninitialized(),
        }
    }

    fn is_writable(&self, data: &Value, path: &PropertyPath) -> bool {
        let Some((last, parents)) = path.elements().split_last() else {
            return false;
        };

        let mut parent = data.clone();
        for (depth, element) in parents.iter().enumerate() {
            parent = match Self::read_element(&parent, element, &path.prefix_string(depth + 1)) {
                Ok(value) => value,
                Err(err) if err.is_uninitialized() => Value::Null,
                Err(_) => return false,
            };
        }

        match &parent {
            Value::Object(object) => {
                let object = object.borrow();
                object
                    .resolve_name(last.key())
                    .and_then(|name| object.property(&name).map(|p| p.is_writable()))
                    .unwrap_or(false)
            }
            Value::Map(_) | Value::Null => true,
            Value::List(items) => last
                .key()
                .parse::<usize>()
                .is_ok_and(|index| index <= items.len()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Object, Property};
    use pretty_assertions::assert_eq;

    fn path(p: &str) -> PropertyPath {
        PropertyPath::parse(p).unwrap()
    }

    fn target() -> Value {
        let child = Object::new("Child").with_property("name", "kid");
        Value::from(
            Object::new("Foo")
                .with_property("foobar", "foobar")
                .with_slot("privateBar", Property::new("privateBar"))
                .with_slot("notAccessibleBar", Property::new("unreachableBar").read_only())
                .with_slot("secret", Property::new("s").write_only())
                .with_uninitialized("later")
                .with_property("child", child)
                .with_property("options", Value::Map(ValueMap::new()))
                .with_property("tags", Value::List(vec![Value::from("a")])),
        )
    }

    #[test]
    fn test_get_value() {
        let accessor = GraphPropertyAccessor::new();
        let data = target();

        assert_eq!(
            accessor.get_value(&data, &path("foobar")).unwrap(),
            Value::from("foobar")
        );
        assert_eq!(
            accessor.get_value(&data, &path("private_bar")).unwrap(),
            Value::from("privateBar")
        );
        assert_eq!(
            accessor.get_value(&data, &path("child.name")).unwrap(),
            Value::from("kid")
        );
        assert_eq!(
            accessor.get_value(&data, &path("tags[0]")).unwrap(),
            Value::from("a")
        );
        assert_eq!(
            accessor.get_value(&data, &path("options[missing]")).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_get_value_errors() {
        let accessor = GraphPropertyAccessor::new();
        let data = target();

        assert!(accessor
            .get_value(&data, &path("later"))
            .unwrap_err()
            .is_uninitialized());
        assert!(matches!(
            accessor.get_value(&data, &path("secret")),
            Err(Error::NotReadable { .. })
        ));
        assert!(matches!(
            accessor.get_value(&data, &path("nope")),
            Err(Error::NoSuchProperty { .. })
        ));
        assert!(matches!(
            accessor.get_value(&data, &path("foobar.deeper")),
            Err(Error::UnexpectedType { .. })
        ));
    }

    #[test]
    fn test_set_value_through_shared_objects() {
        let accessor = GraphPropertyAccessor::new();
        let mut data = target();

        accessor
            .set_value(&mut data, &path("child.name"), Value::from("grown"))
            .unwrap();
        accessor
            .set_value(&mut data, &path("private_bar"), Value::from("changed"))
            .unwrap();

        let object = data.as_object().unwrap();
        let child = object.get("child").unwrap();
        assert_eq!(child.as_object().unwrap().get("name"), Some(Value::from("grown")));
        assert_eq!(object.get("privateBar"), Some(Value::from("changed")));
    }

    #[test]
    fn test_set_value_writes_back_value_types() {
        let accessor = GraphPropertyAccessor::new();
        let mut data = target();

        accessor
            .set_value(&mut data, &path("options[color][shade]"), Value::from("dark"))
            .unwrap();
        accessor
            .set_value(&mut data, &path("tags[1]"), Value::from("b"))
            .unwrap();

        assert_eq!(
            accessor.get_value(&data, &path("options[color][shade]")).unwrap(),
            Value::from("dark")
        );
        assert_eq!(
            accessor.get_value(&data, &path("tags")).unwrap(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
        assert!(matches!(
            accessor.set_value(&mut data, &path("tags[5]"), Value::Null),
            Err(Error::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_set_value_rejections() {
        let accessor = GraphPropertyAccessor::new();
        let failing = Value::from(Object::new("Foo").with_slot(
            "transformError",
            Property::new("init").with_setter(|_| Err("Cannot transform".to_string())),
        ));
        let mut data = failing.clone();

        let err = accessor
            .set_value(&mut data, &path("transform_error"), Value::from("x"))
            .unwrap_err();
        assert!(err.is_transformation_failure());

        let mut data = target();
        assert!(matches!(
            accessor.set_value(&mut data, &path("not_accessible_bar"), Value::from("x")),
            Err(Error::NotWritable { .. })
        ));
    }

    #[test]
    fn test_readable_and_writable_checks() {
        let accessor = GraphPropertyAccessor::new();
        let data = target();

        assert!(accessor.is_readable(&data, &path("later")));
        assert!(!accessor.is_readable(&data, &path("secret")));
        assert!(accessor.is_writable(&data, &path("secret")));
        assert!(accessor.is_writable(&data, &path("private_bar")));
        assert!(!accessor.is_writable(&data, &path("not_accessible_bar")));
        assert!(!accessor.is_writable(&data, &path("unknown")));
        assert!(accessor.is_writable(&data, &path("options[new]")));
        assert!(accessor.is_writable(&data, &path("tags[1]")));
        assert!(!accessor.is_writable(&data, &path("tags[3]")));
        assert!(!accessor.is_writable(&data, &path("foobar.deeper")));
    }
}

//! Value types bound onto targets

use crate::file::UploadedFile;
use crate::object::{Object, ObjectRef};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::collections::HashSet;

/// String-keyed ordered map of values (request parameters, nested arrays)
pub type ValueMap = IndexMap<String, Value>;

/// A value read from a request or held by a target
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// Date-time value with its original offset
    DateTime(DateTime<FixedOffset>),

    /// Ordered list of values
    List(Vec<Value>),

    /// String-keyed map of values
    Map(ValueMap),

    /// Uploaded file
    File(UploadedFile),

    /// Shared object; equality is identity
    Object(ObjectRef),
}

impl Value {
    /// Check if value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string content
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Boolean content
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Date-time content
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Map content
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Shared object handle
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Convert a scalar to its string form
    #[must_use]
    pub fn to_display_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::DateTime(dt) => Some(dt.to_rfc3339()),
            Value::File(file) => Some(file.client_name.clone()),
            Value::Null | Value::List(_) | Value::Map(_) | Value::Object(_) => None,
        }
    }

    /// Short type name used in error messages
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::File(_) => "file",
            Value::Object(_) => "object",
        }
    }

    /// Strict identity.
    ///
    /// Objects are identical only when they are the same allocation. Date-times
    /// must denote the same instant with the same offset, so two equal instants
    /// expressed in different zones are equal (`==`) but not identical.
    #[must_use]
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::DateTime(a), Value::DateTime(b)) => a == b && a.offset() == b.offset(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_identical(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.is_identical(vb))
            }
            _ => self == other,
        }
    }

    /// Build a value from JSON data.
    ///
    /// JSON objects become maps; integers that fit in `i64` stay integers.
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render the value as JSON.
    ///
    /// Objects render their initialized properties; a reference cycle renders
    /// as `null` at the point it closes.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut visiting = HashSet::new();
        self.to_json_inner(&mut visiting)
    }

    fn to_json_inner(&self, visiting: &mut HashSet<usize>) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::List(items) => serde_json::Value::Array(
                items.iter().map(|v| v.to_json_inner(visiting)).collect(),
            ),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_inner(visiting)))
                    .collect(),
            ),
            Value::File(file) => serde_json::to_value(file).unwrap_or(serde_json::Value::Null),
            Value::Object(obj) => {
                if !visiting.insert(obj.addr()) {
                    return serde_json::Value::Null;
                }
                let rendered = obj
                    .borrow()
                    .properties()
                    .filter_map(|(name, prop)| {
                        prop.value()
                            .map(|v| (name.to_string(), v.to_json_inner(visiting)))
                    })
                    .collect();
                visiting.remove(&obj.addr());
                serde_json::Value::Object(rendered)
            }
        }
    }
}

/// Merge `overlay` into `base`, recursing where both sides hold a map or a
/// list. Keys only present in one side are kept; on conflict the overlay wins.
pub fn replace_recursive(base: &mut ValueMap, overlay: ValueMap) {
    for (key, value) in overlay {
        let replacement = match (base.get_mut(&key), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => {
                replace_recursive(existing, incoming);
                None
            }
            (Some(Value::List(existing)), Value::List(incoming)) => {
                replace_list_recursive(existing, incoming);
                None
            }
            (_, value) => Some(value),
        };

        if let Some(value) = replacement {
            base.insert(key, value);
        }
    }
}

fn replace_list_recursive(base: &mut Vec<Value>, overlay: Vec<Value>) {
    for (index, value) in overlay.into_iter().enumerate() {
        let appended = match (base.get_mut(index), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => {
                replace_recursive(existing, incoming);
                None
            }
            (Some(Value::List(existing)), Value::List(incoming)) => {
                replace_list_recursive(existing, incoming);
                None
            }
            (Some(slot), value) => {
                *slot = value;
                None
            }
            (None, value) => Some(value),
        };

        if let Some(value) = appended {
            base.push(value);
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

impl From<UploadedFile> for Value {
    fn from(value: UploadedFile) -> Self {
        Value::File(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(ObjectRef::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: &[(&str, Value)]) -> ValueMap {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = ObjectRef::new(Object::new("Foo"));
        let b = ObjectRef::new(Object::new("Foo"));

        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_datetime_equal_but_not_identical() {
        let utc = DateTime::parse_from_rfc3339("2022-02-09T22:30:00Z").unwrap();
        let cet = DateTime::parse_from_rfc3339("2022-02-09T23:30:00+01:00").unwrap();

        let a = Value::DateTime(utc);
        let b = Value::DateTime(cet);
        assert_eq!(a, b);
        assert!(!a.is_identical(&b));
        assert!(a.is_identical(&Value::DateTime(utc)));
    }

    #[test]
    fn test_replace_recursive_files_win() {
        let mut params = map(&[
            ("name", Value::from("doc")),
            (
                "attachment",
                Value::Map(map(&[("title", Value::from("t")), ("file", Value::Null)])),
            ),
        ]);
        let file = UploadedFile::new("a.txt", "/tmp/a");
        let files = map(&[(
            "attachment",
            Value::Map(map(&[("file", Value::File(file.clone()))])),
        )]);

        replace_recursive(&mut params, files);

        assert_eq!(params.get("name"), Some(&Value::from("doc")));
        let attachment = params.get("attachment").and_then(Value::as_map).unwrap();
        assert_eq!(attachment.get("title"), Some(&Value::from("t")));
        assert_eq!(attachment.get("file"), Some(&Value::File(file)));
    }

    #[test]
    fn test_replace_recursive_lists_by_index() {
        let mut base = map(&[(
            "items",
            Value::List(vec![Value::from("a"), Value::from("b")]),
        )]);
        let overlay = map(&[(
            "items",
            Value::List(vec![Value::from("x"), Value::from("y"), Value::from("z")]),
        )]);

        replace_recursive(&mut base, overlay);
        assert_eq!(
            base.get("items"),
            Some(&Value::List(vec![
                Value::from("x"),
                Value::from("y"),
                Value::from("z")
            ]))
        );
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::json!({"a": 1, "b": [true, null], "c": {"d": 1.5}});
        let value = Value::from_json(json.clone());

        let root = value.as_map().unwrap();
        assert_eq!(root.get("a"), Some(&Value::Integer(1)));
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_object_to_json_breaks_cycles() {
        let parent = ObjectRef::new(Object::new("Node").with_property("name", "root"));
        parent
            .borrow_mut()
            .set_raw("self_ref", Value::Object(parent.clone()));

        let json = Value::Object(parent).to_json();
        assert_eq!(json, serde_json::json!({"name": "root", "self_ref": null}));
    }
}

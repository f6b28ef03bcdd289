//! Data transformers
//!
//! A transformer converts between the submitted (view) form of a field and
//! the form stored on the target (model). A failed reverse transformation
//! leaves the field unsynchronized: its value is not written and the field
//! reports its invalid message.

use crate::error::TransformationFailed;
use chrono::{DateTime, FixedOffset};
use reqbind_value::Value;

type Result<T> = std::result::Result<T, TransformationFailed>;

/// Converts field values between view and model form
pub trait DataTransformer {
    /// Model value to view value
    fn transform(&self, value: &Value) -> Result<Value>;

    /// Submitted view value to model value
    fn reverse_transform(&self, value: Value) -> Result<Value>;
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parses strings into date-times, either RFC 3339 or a chrono format
#[derive(Debug, Clone, Default)]
pub struct DateTimeTransformer {
    format: Option<String>,
}

impl DateTimeTransformer {
    /// RFC 3339 transformer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformer for a `chrono` format string; the format must carry an offset
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>> {
        let parsed = match &self.format {
            Some(format) => DateTime::parse_from_str(input, format),
            None => DateTime::parse_from_rfc3339(input),
        };
        parsed.map_err(|e| TransformationFailed::new(format!("Invalid date-time \"{input}\": {e}")))
    }
}

impl DataTransformer for DateTimeTransformer {
    fn transform(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::DateTime(dt) => Ok(Value::String(match &self.format {
                Some(format) => dt.format(format).to_string(),
                None => dt.to_rfc3339(),
            })),
            other => Err(TransformationFailed::new(format!(
                "Expected a date-time, found {}",
                other.type_name()
            ))),
        }
    }

    fn reverse_transform(&self, value: Value) -> Result<Value> {
        if is_empty(&value) {
            return Ok(Value::Null);
        }

        match value {
            Value::DateTime(_) => Ok(value),
            Value::String(s) => self.parse(s.trim()).map(Value::DateTime),
            other => Err(TransformationFailed::new(format!(
                "Expected a string, found {}",
                other.type_name()
            ))),
        }
    }
}

/// Parses integers from strings and integral floats
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerTransformer;

impl DataTransformer for IntegerTransformer {
    fn transform(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Integer(i) => Ok(Value::String(i.to_string())),
            other => Err(TransformationFailed::new(format!(
                "Expected an integer, found {}",
                other.type_name()
            ))),
        }
    }

    fn reverse_transform(&self, value: Value) -> Result<Value> {
        if is_empty(&value) {
            return Ok(Value::Null);
        }

        match value {
            Value::Integer(_) => Ok(value),
            #[allow(clippy::cast_possible_truncation)]
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Value::Integer(f as i64)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| TransformationFailed::new(format!("\"{s}\" is not an integer"))),
            other => Err(TransformationFailed::new(format!(
                "Expected an integer, found {}",
                other.type_name()
            ))),
        }
    }
}

/// Parses the usual boolean spellings (`1`, `true`, `yes`, `on`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanTransformer;

const TRUE_VALUES: &[&str] = &["1", "true", "yes", "on", "y", "t"];
const FALSE_VALUES: &[&str] = &["0", "false", "no", "off", "n", "f", ""];

impl DataTransformer for BooleanTransformer {
    fn transform(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null | Value::Bool(_) => Ok(value.clone()),
            other => Err(TransformationFailed::new(format!(
                "Expected a boolean, found {}",
                other.type_name()
            ))),
        }
    }

    fn reverse_transform(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null | Value::Bool(_) => Ok(value),
            Value::Integer(0) => Ok(Value::Bool(false)),
            Value::Integer(1) => Ok(Value::Bool(true)),
            Value::String(s) => {
                let lowered = s.trim().to_ascii_lowercase();
                if TRUE_VALUES.contains(&lowered.as_str()) {
                    Ok(Value::Bool(true))
                } else if FALSE_VALUES.contains(&lowered.as_str()) {
                    Ok(Value::Bool(false))
                } else {
                    Err(TransformationFailed::new(format!(
                        "\"{s}\" is not a boolean"
                    )))
                }
            }
            other => Err(TransformationFailed::new(format!(
                "Expected a boolean, found {}",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_rfc3339() {
        let transformer = DateTimeTransformer::new();
        let value = transformer
            .reverse_transform(Value::from("2024-03-01T10:00:00+02:00"))
            .unwrap();
        let dt = value.as_datetime().unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
        assert_eq!(
            transformer.transform(&value).unwrap(),
            Value::from("2024-03-01T10:00:00+02:00")
        );

        assert_eq!(transformer.reverse_transform(Value::from("")).unwrap(), Value::Null);
        assert!(transformer.reverse_transform(Value::from("yesterday")).is_err());
        assert!(transformer.reverse_transform(Value::from(12)).is_err());
    }

    #[test]
    fn test_datetime_custom_format() {
        let transformer = DateTimeTransformer::with_format("%d/%m/%Y %H:%M %z");
        let value = transformer
            .reverse_transform(Value::from("01/03/2024 10:00 +0000"))
            .unwrap();
        assert_eq!(
            transformer.transform(&value).unwrap(),
            Value::from("01/03/2024 10:00 +0000")
        );
    }

    #[test]
    fn test_integer() {
        let transformer = IntegerTransformer;
        assert_eq!(transformer.reverse_transform(Value::from(" 42 ")).unwrap(), Value::from(42));
        assert_eq!(transformer.reverse_transform(Value::from(3.0)).unwrap(), Value::from(3));
        assert_eq!(transformer.reverse_transform(Value::Null).unwrap(), Value::Null);
        assert!(transformer.reverse_transform(Value::from("4.5")).is_err());
        assert!(transformer.reverse_transform(Value::from(4.5)).is_err());
    }

    #[test]
    fn test_boolean() {
        let transformer = BooleanTransformer;
        assert_eq!(transformer.reverse_transform(Value::from("Yes")).unwrap(), Value::from(true));
        assert_eq!(transformer.reverse_transform(Value::from("off")).unwrap(), Value::from(false));
        assert_eq!(transformer.reverse_transform(Value::from(1)).unwrap(), Value::from(true));
        assert!(transformer.reverse_transform(Value::from("maybe")).is_err());
    }
}

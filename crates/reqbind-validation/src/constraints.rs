//! Built-in constraints

use crate::context::ExecutionContext;
use crate::{Error, Result};
use reqbind_value::Value;
use std::fmt;
use std::rc::Rc;

/// Callback constraint body: receives the validated value and the context
/// to report violations through
pub type CallbackFn = Rc<dyn Fn(&Value, &mut ExecutionContext<'_>)>;

pub const IS_BLANK_ERROR: &str = "IS_BLANK_ERROR";
pub const IS_NULL_ERROR: &str = "IS_NULL_ERROR";
pub const REGEX_FAILED_ERROR: &str = "REGEX_FAILED_ERROR";
pub const TOO_SHORT_ERROR: &str = "TOO_SHORT_ERROR";
pub const TOO_LONG_ERROR: &str = "TOO_LONG_ERROR";
pub const NOT_EQUAL_LENGTH_ERROR: &str = "NOT_EQUAL_LENGTH_ERROR";

const NOT_BLANK_MESSAGE: &str = "This value should not be blank.";
const NOT_NULL_MESSAGE: &str = "This value should not be null.";
const REGEX_MESSAGE: &str = "This value is not valid.";
const MIN_MESSAGE: &str = "This value is too short. It should have {{ limit }} character or more.|This value is too short. It should have {{ limit }} characters or more.";
const MAX_MESSAGE: &str = "This value is too long. It should have {{ limit }} character or less.|This value is too long. It should have {{ limit }} characters or less.";
const EXACT_MESSAGE: &str = "This value should have exactly {{ limit }} character.|This value should have exactly {{ limit }} characters.";

/// A rule attached to a class or to one of its properties
#[derive(Clone)]
pub enum Constraint {
    /// Rejects null, `false`, empty strings and empty collections
    NotBlank { message: String },
    /// Rejects null
    NotNull { message: String },
    /// Requires string values to match (or not match) a pattern
    Regex {
        regex: regex::Regex,
        matches: bool,
        message: String,
    },
    /// Bounds the character count of string values
    Length {
        min: Option<usize>,
        max: Option<usize>,
        min_message: String,
        max_message: String,
        exact_message: String,
    },
    /// Cascades validation into the nested value
    Valid,
    /// Runs arbitrary code against the value
    Callback(CallbackFn),
}

impl Constraint {
    #[must_use]
    pub fn not_blank() -> Self {
        Self::NotBlank {
            message: NOT_BLANK_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn not_null() -> Self {
        Self::NotNull {
            message: NOT_NULL_MESSAGE.to_string(),
        }
    }

    /// Pattern constraint; fails on invalid patterns
    pub fn regex(pattern: &str) -> Result<Self> {
        let regex = regex::Regex::new(pattern).map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self::Regex {
            regex,
            matches: true,
            message: REGEX_MESSAGE.to_string(),
        })
    }

    /// Length constraint; at least one bound is required
    pub fn length(min: Option<usize>, max: Option<usize>) -> Result<Self> {
        match (min, max) {
            (None, None) => {
                return Err(Error::Constraint(
                    "length requires a minimum or a maximum".to_string(),
                ));
            }
            (Some(lo), Some(hi)) if lo > hi => {
                return Err(Error::Constraint(format!(
                    "length minimum {lo} exceeds maximum {hi}"
                )));
            }
            _ => {}
        }

        Ok(Self::Length {
            min,
            max,
            min_message: MIN_MESSAGE.to_string(),
            max_message: MAX_MESSAGE.to_string(),
            exact_message: EXACT_MESSAGE.to_string(),
        })
    }

    #[must_use]
    pub fn valid() -> Self {
        Self::Valid
    }

    pub fn callback(f: impl Fn(&Value, &mut ExecutionContext<'_>) + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }

    /// Override the violation message
    #[must_use]
    pub fn with_message(self, custom: impl Into<String>) -> Self {
        let custom = custom.into();
        match self {
            Self::NotBlank { .. } => Self::NotBlank { message: custom },
            Self::NotNull { .. } => Self::NotNull { message: custom },
            Self::Regex { regex, matches, .. } => Self::Regex {
                regex,
                matches,
                message: custom,
            },
            Self::Length { min, max, .. } => Self::Length {
                min,
                max,
                min_message: custom.clone(),
                max_message: custom.clone(),
                exact_message: custom,
            },
            other => other,
        }
    }

    /// Invert a pattern constraint so that matching values fail
    #[must_use]
    pub fn not_matching(self) -> Self {
        match self {
            Self::Regex { regex, message, .. } => Self::Regex {
                regex,
                matches: false,
                message,
            },
            other => other,
        }
    }

    /// Whether this constraint cascades instead of checking the value itself
    #[must_use]
    pub fn is_cascade(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check `value`, reporting failures through `context`
    pub fn validate(&self, value: &Value, context: &mut ExecutionContext<'_>) {
        match self {
            Self::NotBlank { message } => {
                if is_blank(value) {
                    context
                        .build_violation(message)
                        .set_parameter("{{ value }}", format_value(value))
                        .set_invalid_value(value.clone())
                        .set_code(IS_BLANK_ERROR)
                        .add();
                }
            }
            Self::NotNull { message } => {
                if value.is_null() {
                    context
                        .build_violation(message)
                        .set_parameter("{{ value }}", format_value(value))
                        .set_invalid_value(Value::Null)
                        .set_code(IS_NULL_ERROR)
                        .add();
                }
            }
            Self::Regex {
                regex,
                matches,
                message,
            } => {
                let Some(text) = checkable_string(value) else {
                    return;
                };
                if regex.is_match(&text) != *matches {
                    context
                        .build_violation(message)
                        .set_parameter("{{ value }}", format_value(value))
                        .set_parameter("{{ pattern }}", regex.as_str())
                        .set_invalid_value(value.clone())
                        .set_code(REGEX_FAILED_ERROR)
                        .add();
                }
            }
            Self::Length {
                min,
                max,
                min_message,
                max_message,
                exact_message,
            } => {
                let Some(text) = checkable_string(value) else {
                    return;
                };
                let length = text.chars().count();
                let exact = min.is_some() && min == max;

                let failure = if let Some(limit) = max.filter(|limit| length > *limit) {
                    Some((
                        if exact { exact_message } else { max_message },
                        limit,
                        if exact { NOT_EQUAL_LENGTH_ERROR } else { TOO_LONG_ERROR },
                    ))
                } else if let Some(limit) = min.filter(|limit| length < *limit) {
                    Some((
                        if exact { exact_message } else { min_message },
                        limit,
                        if exact { NOT_EQUAL_LENGTH_ERROR } else { TOO_SHORT_ERROR },
                    ))
                } else {
                    None
                };

                if let Some((message, limit, code)) = failure {
                    context
                        .build_violation(message)
                        .set_parameter("{{ value }}", format_value(value))
                        .set_parameter("{{ limit }}", limit.to_string())
                        .set_plural(i64::try_from(limit).unwrap_or(i64::MAX))
                        .set_invalid_value(value.clone())
                        .set_code(code)
                        .add();
                }
            }
            Self::Valid => {}
            Self::Callback(callback) => callback(value, context),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBlank { message } => f.debug_struct("NotBlank").field("message", message).finish(),
            Self::NotNull { message } => f.debug_struct("NotNull").field("message", message).finish(),
            Self::Regex {
                regex,
                matches,
                message,
            } => f
                .debug_struct("Regex")
                .field("pattern", &regex.as_str())
                .field("matches", matches)
                .field("message", message)
                .finish(),
            Self::Length { min, max, .. } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Valid => f.write_str("Valid"),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        _ => false,
    }
}

/// String form of a scalar worth checking; null and empty strings are left
/// to `NotBlank`
fn checkable_string(value: &Value) -> Option<String> {
    value.to_display_string().filter(|s| !s.is_empty())
}

/// Render a value for the `{{ value }}` placeholder
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::List(_) | Value::Map(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
        other => other.to_display_string().unwrap_or_default(),
    }
}

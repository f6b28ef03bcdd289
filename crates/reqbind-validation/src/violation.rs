//! Constraint violations

use crate::translator::Parameters;
use reqbind_value::Value;
use std::fmt;

/// A single validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Rendered (possibly translated) message
    message: String,
    /// Untranslated message template
    message_template: String,
    /// Template parameters
    parameters: Parameters,
    /// Number used to select a plural form
    plural: Option<i64>,
    /// Dotted path from the validated root (`child.grandchild`, `items[0]`)
    property_path: String,
    /// Value that failed validation
    invalid_value: Option<Value>,
    /// Machine-readable code
    code: Option<String>,
}

impl ConstraintViolation {
    /// Create a violation whose template is its message
    pub fn new(message: impl Into<String>, property_path: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message_template: message.clone(),
            message,
            parameters: Parameters::new(),
            plural: None,
            property_path: property_path.into(),
            invalid_value: None,
            code: None,
        }
    }

    /// Set the untranslated template
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = template.into();
        self
    }

    /// Set template parameters
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the pluralization count
    #[must_use]
    pub fn with_plural(mut self, plural: i64) -> Self {
        self.plural = Some(plural);
        self
    }

    /// Set the offending value
    #[must_use]
    pub fn with_invalid_value(mut self, value: Value) -> Self {
        self.invalid_value = Some(value);
        self
    }

    /// Set the violation code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[must_use]
    pub fn plural(&self) -> Option<i64> {
        self.plural
    }

    #[must_use]
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    #[must_use]
    pub fn invalid_value(&self) -> Option<&Value> {
        self.invalid_value.as_ref()
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// Ordered list of violations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintViolationList {
    violations: Vec<ConstraintViolation>,
}

impl ConstraintViolationList {
    /// Create an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation
    pub fn add(&mut self, violation: ConstraintViolation) {
        self.violations.push(violation);
    }

    /// Append all violations of another list
    pub fn extend(&mut self, other: ConstraintViolationList) {
        self.violations.extend(other.violations);
    }

    /// Violation at `index`
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ConstraintViolation> {
        self.violations.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterate in report order
    pub fn iter(&self) -> std::slice::Iter<'_, ConstraintViolation> {
        self.violations.iter()
    }
}

impl IntoIterator for ConstraintViolationList {
    type Item = ConstraintViolation;
    type IntoIter = std::vec::IntoIter<ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConstraintViolationList {
    type Item = &'a ConstraintViolation;
    type IntoIter = std::slice::Iter<'a, ConstraintViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl FromIterator<ConstraintViolation> for ConstraintViolationList {
    fn from_iter<I: IntoIterator<Item = ConstraintViolation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ConstraintViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.violations {
            writeln!(f, "{}:", violation.property_path)?;
            writeln!(f, "    {}", violation.message)?;
        }
        Ok(())
    }
}

//! Violation reporting context

use crate::translator::{COUNT_PARAMETER, Parameters, Translator, render_message};
use crate::violation::{ConstraintViolation, ConstraintViolationList};
use reqbind_value::Value;

/// Where constraints report their violations.
///
/// A context is positioned at a property path; violations added through it
/// land at that path unless the builder moves them further down.
pub struct ExecutionContext<'a> {
    violations: &'a mut ConstraintViolationList,
    translator: Option<&'a dyn Translator>,
    domain: &'a str,
    property_path: String,
}

impl<'a> ExecutionContext<'a> {
    /// Context at the root path
    pub fn new(
        violations: &'a mut ConstraintViolationList,
        translator: Option<&'a dyn Translator>,
        domain: &'a str,
    ) -> Self {
        Self {
            violations,
            translator,
            domain,
            property_path: String::new(),
        }
    }

    /// Reposition the context
    #[must_use]
    pub fn at(mut self, property_path: impl Into<String>) -> Self {
        self.property_path = property_path.into();
        self
    }

    /// Current property path
    #[must_use]
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    /// Report a violation at the current path
    pub fn add_violation(&mut self, message: &str) {
        self.build_violation(message).add();
    }

    /// Start building a violation at the current path
    pub fn build_violation(&mut self, message: &str) -> ViolationBuilder<'_, 'a> {
        ViolationBuilder {
            path: self.property_path.clone(),
            context: self,
            template: message.to_string(),
            parameters: Parameters::new(),
            plural: None,
            invalid_value: None,
            code: None,
        }
    }

    fn render(&self, template: &str, parameters: &Parameters) -> String {
        match self.translator {
            Some(translator) => translator.trans(template, parameters, Some(self.domain)),
            None => render_message(template, parameters),
        }
    }
}

/// Builder for a single violation
pub struct ViolationBuilder<'c, 'a> {
    context: &'c mut ExecutionContext<'a>,
    path: String,
    template: String,
    parameters: Parameters,
    plural: Option<i64>,
    invalid_value: Option<Value>,
    code: Option<String>,
}

impl ViolationBuilder<'_, '_> {
    /// Move the violation to a sub-path (`name`, `[0]`)
    #[must_use]
    pub fn at_path(mut self, sub_path: &str) -> Self {
        self.path = join_path(&self.path, sub_path);
        self
    }

    #[must_use]
    pub fn set_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn set_plural(mut self, plural: i64) -> Self {
        self.plural = Some(plural);
        self
    }

    #[must_use]
    pub fn set_invalid_value(mut self, value: Value) -> Self {
        self.invalid_value = Some(value);
        self
    }

    #[must_use]
    pub fn set_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render the message and record the violation
    pub fn add(self) {
        let mut render_parameters = self.parameters.clone();
        if let Some(plural) = self.plural {
            render_parameters.insert(COUNT_PARAMETER.to_string(), plural.to_string());
        }
        let message = self.context.render(&self.template, &render_parameters);

        let mut violation = ConstraintViolation::new(message, self.path)
            .with_template(self.template)
            .with_parameters(self.parameters);
        if let Some(plural) = self.plural {
            violation = violation.with_plural(plural);
        }
        if let Some(value) = self.invalid_value {
            violation = violation.with_invalid_value(value);
        }
        if let Some(code) = self.code {
            violation = violation.with_code(code);
        }

        self.context.violations.add(violation);
    }
}

/// Append a path segment: `a` + `b` is `a.b`, `a` + `[0]` is `a[0]`
#[must_use]
pub fn join_path(base: &str, segment: &str) -> String {
    if segment.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        segment.to_string()
    } else if segment.starts_with('[') {
        format!("{base}{segment}")
    } else {
        format!("{base}.{segment}")
    }
}

//! Recursive validator

use crate::DEFAULT_DOMAIN;
use crate::context::{ExecutionContext, join_path};
use crate::metadata::{ClassMetadata, MetadataRegistry};
use crate::translator::Translator;
use crate::violation::ConstraintViolationList;
use reqbind_value::{ObjectRef, Value};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace};

/// Validates a value graph
pub trait Validator {
    /// Validate `value` and return every violation, in report order
    fn validate(&self, value: &Value) -> ConstraintViolationList;
}

/// Metadata-driven validator.
///
/// Objects are validated against the metadata registered for their class:
/// class-level constraints first, then property constraints in declaration
/// order. `Valid` cascades into objects, lists and maps; every object is
/// validated at most once per call, so reference cycles terminate.
#[derive(Clone)]
pub struct RecursiveValidator {
    metadata: MetadataRegistry,
    translator: Option<Rc<dyn Translator>>,
    domain: String,
}

struct Walk<'v> {
    validator: &'v RecursiveValidator,
    visited: HashSet<usize>,
    violations: ConstraintViolationList,
}

impl RecursiveValidator {
    #[must_use]
    pub fn new(metadata: MetadataRegistry) -> Self {
        Self {
            metadata,
            translator: None,
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    #[must_use]
    pub fn translation_domain(&self) -> &str {
        &self.domain
    }
}

impl Validator for RecursiveValidator {
    fn validate(&self, value: &Value) -> ConstraintViolationList {
        let mut walk = Walk {
            validator: self,
            visited: HashSet::new(),
            violations: ConstraintViolationList::new(),
        };
        walk.cascade(value, "");

        debug!(violations = walk.violations.len(), "Validation finished");
        walk.violations
    }
}

impl Walk<'_> {
    fn cascade(&mut self, value: &Value, path: &str) {
        match value {
            Value::Object(object) => self.validate_object(object, path),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.cascade(item, &join_path(path, &format!("[{index}]")));
                }
            }
            Value::Map(map) => {
                for (key, item) in map {
                    self.cascade(item, &join_path(path, &format!("[{key}]")));
                }
            }
            _ => {}
        }
    }

    fn validate_object(&mut self, object: &ObjectRef, path: &str) {
        if !self.visited.insert(object.addr()) {
            return;
        }

        let validator = self.validator;
        let class = object.class();
        let Some(metadata) = validator.metadata.get(&class) else {
            trace!(class = %class, "No constraint metadata");
            return;
        };
        trace!(class = %class, path, "Validating object");

        self.check_class(metadata, object, path);
        for (property, constraints) in metadata.property_constraints() {
            let value = object.get(property).unwrap_or(Value::Null);
            let property_path = join_path(path, property);

            for constraint in constraints {
                if constraint.is_cascade() {
                    self.cascade(&value, &property_path);
                } else {
                    let mut context = self.context().at(property_path.clone());
                    constraint.validate(&value, &mut context);
                }
            }
        }
    }

    fn check_class(&mut self, metadata: &ClassMetadata, object: &ObjectRef, path: &str) {
        let value = Value::Object(object.clone());
        for constraint in metadata.constraints() {
            if constraint.is_cascade() {
                continue;
            }
            let mut context = self.context().at(path);
            constraint.validate(&value, &mut context);
        }
    }

    fn context(&mut self) -> ExecutionContext<'_> {
        ExecutionContext::new(
            &mut self.violations,
            self.validator.translator.as_deref(),
            &self.validator.domain,
        )
    }
}

/// Builder for `RecursiveValidator`
#[derive(Default)]
pub struct ValidatorBuilder {
    metadata: MetadataRegistry,
    translator: Option<Rc<dyn Translator>>,
    domain: Option<String>,
}

impl ValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register constraints for a class
    #[must_use]
    pub fn add_class_metadata(mut self, metadata: ClassMetadata) -> Self {
        self.metadata.register(metadata);
        self
    }

    /// Replace the whole metadata registry
    #[must_use]
    pub fn with_metadata(mut self, metadata: MetadataRegistry) -> Self {
        self.metadata = metadata;
        self
    }

    /// Translate violation messages
    #[must_use]
    pub fn set_translator(mut self, translator: Rc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn set_translation_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn build(self) -> RecursiveValidator {
        RecursiveValidator {
            metadata: self.metadata,
            translator: self.translator,
            domain: self.domain.unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        }
    }
}

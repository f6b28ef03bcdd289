//! Per-class constraint metadata

use crate::constraints::Constraint;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Constraints declared for one class
#[derive(Debug, Clone)]
pub struct ClassMetadata {
    class: String,
    constraints: Vec<Constraint>,
    properties: IndexMap<String, Vec<Constraint>>,
}

impl ClassMetadata {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            constraints: Vec::new(),
            properties: IndexMap::new(),
        }
    }

    /// Add a constraint on the object itself
    #[must_use]
    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add a constraint on one property
    #[must_use]
    pub fn add_property_constraint(
        mut self,
        property: impl Into<String>,
        constraint: Constraint,
    ) -> Self {
        self.properties
            .entry(property.into())
            .or_default()
            .push(constraint);
        self
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Property constraints in declaration order
    pub fn property_constraints(&self) -> impl Iterator<Item = (&str, &[Constraint])> {
        self.properties
            .iter()
            .map(|(name, constraints)| (name.as_str(), constraints.as_slice()))
    }

    /// Constraints of one property
    #[must_use]
    pub fn constraints_for(&self, property: &str) -> &[Constraint] {
        self.properties
            .get(property)
            .map_or(&[][..], Vec::as_slice)
    }
}

/// Class name → metadata lookup
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    classes: HashMap<String, ClassMetadata>,
}

impl MetadataRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata, replacing any earlier entry for the class
    pub fn register(&mut self, metadata: ClassMetadata) {
        self.classes.insert(metadata.class.clone(), metadata);
    }

    #[must_use]
    pub fn with_class(mut self, metadata: ClassMetadata) -> Self {
        self.register(metadata);
        self
    }

    #[must_use]
    pub fn get(&self, class: &str) -> Option<&ClassMetadata> {
        self.classes.get(class)
    }

    #[must_use]
    pub fn has(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }
}

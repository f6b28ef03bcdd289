//! Field registry

use crate::field::Field;
use indexmap::IndexMap;
use reqbind_value::{camelize, snake_case};
use std::collections::HashMap;

/// Ordered set of the fields a mapper may write.
///
/// Fields are declared with underscored names (`private_bar`) while
/// validation paths use the camel form of property names (`privateBar`).
/// The registry keeps a camel → declared alias table, built once, so a path
/// segment can be matched to its field whatever convention produced it.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: IndexMap<String, Field>,
    camelized: HashMap<String, String>,
}

impl FieldRegistry {
    pub fn new<F: Into<Field>>(fields: impl IntoIterator<Item = F>) -> Self {
        let fields: IndexMap<String, Field> = fields
            .into_iter()
            .map(|field| {
                let field: Field = field.into();
                (field.name().to_string(), field)
            })
            .collect();
        let camelized = fields
            .keys()
            .map(|name| (camelize(name), name.clone()))
            .collect();

        Self { fields, camelized }
    }

    /// Field declared under exactly this name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Whether a field is declared under exactly this name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Whether a path segment designates a declared field, in either
    /// naming convention
    #[must_use]
    pub fn is_known(&self, segment: &str) -> bool {
        self.contains(segment) || self.camelized.contains_key(segment)
    }

    /// Name under which a path segment is reported.
    ///
    /// Declared names and their camel aliases map to the declared name;
    /// anything else (nested properties) is converted to underscored form.
    #[must_use]
    pub fn normalize(&self, segment: &str) -> String {
        if self.contains(segment) {
            return segment.to_string();
        }

        match self.camelized.get(segment) {
            Some(declared) => declared.clone(),
            None => snake_case(segment),
        }
    }

    /// Declared fields in order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

//! Mapping result tree

use serde::Serialize;
use serde_json::json;

/// Named node of the error tree.
///
/// The root node has an empty name. Children are the fields (and nested
/// properties) that collected errors; nodes without errors anywhere below
/// them are never part of a tree built by a mapper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingResult {
    name: String,
    children: Vec<MappingResult>,
    errors: Vec<String>,
}

impl MappingResult {
    pub fn new(name: impl Into<String>, children: Vec<MappingResult>, errors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            children,
            errors,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn children(&self) -> &[MappingResult] {
        &self.children
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Direct child by name
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&MappingResult> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Whether this node or any descendant holds an error
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.children.iter().any(MappingResult::has_errors)
    }

    /// Total number of errors in the tree
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
            + self
                .children
                .iter()
                .map(MappingResult::error_count)
                .sum::<usize>()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "children": self.children.iter().map(MappingResult::to_json).collect::<Vec<_>>(),
            "errors": self.errors,
        })
    }
}

//! Property paths
//!
//! A path addresses a location in a value graph: `child.name` walks object
//! properties, `items[0]` and `options[color]` index into lists and maps.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One step of a property path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// Object property (`.name`)
    Property(String),

    /// List or map index (`[key]`)
    Index(String),
}

impl PathElement {
    /// Name or key of this element
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            PathElement::Property(name) | PathElement::Index(name) => name,
        }
    }
}

/// A parsed property path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    elements: Vec<PathElement>,
}

impl PropertyPath {
    /// Parse a path expression
    ///
    /// # Errors
    ///
    /// Returns an error for empty paths, empty segments and unbalanced brackets.
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::invalid_path(path, "path is empty"));
        }

        let mut elements = Vec::new();
        let mut rest = path;
        let mut expect_property = true;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let end = after
                    .find(']')
                    .ok_or_else(|| Error::invalid_path(path, "unclosed '['"))?;
                let key = &after[..end];
                if key.is_empty() {
                    return Err(Error::invalid_path(path, "empty index"));
                }
                elements.push(PathElement::Index(key.to_string()));
                rest = &after[end + 1..];
                expect_property = false;
                continue;
            }

            if !expect_property {
                rest = rest.strip_prefix('.').ok_or_else(|| {
                    Error::invalid_path(path, "expected '.' or '[' after index")
                })?;
                if rest.is_empty() {
                    return Err(Error::invalid_path(path, "trailing '.'"));
                }
            }

            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() {
                return Err(Error::invalid_path(path, "empty property name"));
            }
            if name.contains(']') {
                return Err(Error::invalid_path(path, "unexpected ']'"));
            }
            elements.push(PathElement::Property(name.to_string()));
            rest = &rest[end..];
            expect_property = false;
        }

        Ok(Self { elements })
    }

    /// Single-property path, used verbatim without parsing
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            elements: vec![PathElement::Property(name.into())],
        }
    }

    /// Path elements in order
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the path has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render the first `len` elements as a path string
    #[must_use]
    pub fn prefix_string(&self, len: usize) -> String {
        render(&self.elements[..len.min(self.elements.len())])
    }
}

fn render(elements: &[PathElement]) -> String {
    let mut out = String::new();
    for element in elements {
        match element {
            PathElement::Property(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathElement::Index(key) => {
                out.push('[');
                out.push_str(key);
                out.push(']');
            }
        }
    }
    out
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.elements))
    }
}

impl FromStr for PropertyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

//! Error tree assembly
//!
//! Validation reports violations against flat dotted paths
//! (`child.grandchild`). `ErrorTree` files each message under the node its path names,
//! creating intermediate nodes on the way, and converts into an immutable
//! `MappingResult` once everything has been collected.

use crate::registry::FieldRegistry;
use crate::result::MappingResult;
use indexmap::IndexMap;
use reqbind_validation::ConstraintViolationList;

#[derive(Debug, Default)]
struct Node {
    children: IndexMap<String, Node>,
    errors: Vec<String>,
}

impl Node {
    fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.children.values().any(Node::has_errors)
    }

    fn into_result(self, name: String) -> MappingResult {
        let children = self
            .children
            .into_iter()
            .filter(|(_, child)| child.has_errors())
            .map(|(child_name, child)| child.into_result(child_name))
            .collect();
        MappingResult::new(name, children, self.errors)
    }
}

/// Mutable error tree built during one `map` call
#[derive(Debug, Default)]
pub struct ErrorTree {
    root: Node,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the root node
    pub fn add_root_error(&mut self, message: impl Into<String>) {
        self.root.errors.push(message.into());
    }

    /// Add an error at the node reached by `segments`, creating nodes as
    /// needed; an empty path designates the root
    pub fn add_at<S: AsRef<str>>(&mut self, segments: &[S], message: impl Into<String>) {
        let node = segments.iter().fold(&mut self.root, |node, segment| {
            node.children.entry(segment.as_ref().to_string()).or_default()
        });
        node.errors.push(message.into());
    }

    /// File each violation under the field its path starts with.
    ///
    /// Paths are split on dots only. Violations whose first segment is not a
    /// declared field (in either naming convention) are reported on the root
    /// node, so `items[0].name` goes to the root even when `items` is declared.
    pub fn reconcile(&mut self, violations: &ConstraintViolationList, registry: &FieldRegistry) {
        for violation in violations {
            let segments = split_path(violation.property_path());
            let message = violation.message().to_string();

            match segments.first() {
                Some(first) if registry.is_known(first) => {
                    let normalized: Vec<String> =
                        segments.iter().map(|s| registry.normalize(s)).collect();
                    self.add_at(&normalized, message);
                }
                _ => self.add_root_error(message),
            }
        }
    }

    /// Whether any node holds an error
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.root.has_errors()
    }

    /// Freeze into a result tree rooted at an empty name; nodes without
    /// errors below them are dropped
    #[must_use]
    pub fn into_result(self) -> MappingResult {
        self.root.into_result(String::new())
    }
}

/// Split a violation path on dots: `a.b[0].c` gives `a`, `b[0]`, `c`
fn split_path(path: &str) -> Vec<&str> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqbind_validation::ConstraintViolation;

    fn violations(entries: &[(&str, &str)]) -> ConstraintViolationList {
        entries
            .iter()
            .map(|(path, message)| ConstraintViolation::new(*message, *path))
            .collect()
    }

    fn registry() -> FieldRegistry {
        FieldRegistry::new(["foobar", "private_bar", "child"])
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("child.grandchild"), vec!["child", "grandchild"]);
        assert_eq!(split_path("items[0].name"), vec!["items[0]", "name"]);
        assert_eq!(split_path("name"), vec!["name"]);
        assert!(split_path("").is_empty());
    }

    #[test]
    fn test_nested_path_builds_nodes() {
        let mut tree = ErrorTree::new();
        tree.reconcile(&violations(&[("child.grandchild", "Bad.")]), &registry());

        let result = tree.into_result();
        assert!(result.errors().is_empty());
        let grandchild = result
            .child("child")
            .and_then(|c| c.child("grandchild"))
            .unwrap();
        assert_eq!(grandchild.errors(), ["Bad."]);
        assert!(result.child("child").unwrap().errors().is_empty());
    }

    #[test]
    fn test_unknown_first_segment_goes_to_root() {
        let mut tree = ErrorTree::new();
        tree.reconcile(
            &violations(&[("notMappedChild", "Not valid."), ("", "Whole object.")]),
            &registry(),
        );

        let result = tree.into_result();
        assert_eq!(result.errors(), ["Not valid.", "Whole object."]);
        assert!(result.children().is_empty());
    }

    #[test]
    fn test_indexed_first_segment_goes_to_root() {
        let registry = FieldRegistry::new(["items"]);
        let mut tree = ErrorTree::new();
        tree.reconcile(&violations(&[("items[0].name", "Bad.")]), &registry);

        let result = tree.into_result();
        assert_eq!(result.errors(), ["Bad."]);
        assert!(result.children().is_empty());
    }

    #[test]
    fn test_indexed_nested_segment_is_snake_cased() {
        let mut tree = ErrorTree::new();
        tree.reconcile(&violations(&[("child.items[0]", "Bad.")]), &registry());

        let result = tree.into_result();
        let item = result
            .child("child")
            .and_then(|c| c.child("items_0_"))
            .unwrap();
        assert_eq!(item.errors(), ["Bad."]);
    }

    #[test]
    fn test_camel_segments_are_normalized() {
        let mut tree = ErrorTree::new();
        tree.reconcile(
            &violations(&[
                ("privateBar", "Blank."),
                ("child.someValue", "Short."),
                ("child.someValue", "Wrong."),
            ]),
            &registry(),
        );

        let result = tree.into_result();
        assert_eq!(result.child("private_bar").unwrap().errors(), ["Blank."]);
        assert_eq!(
            result
                .child("child")
                .and_then(|c| c.child("some_value"))
                .unwrap()
                .errors(),
            ["Short.", "Wrong."]
        );
    }

    #[test]
    fn test_field_errors_and_violations_share_nodes() {
        let mut tree = ErrorTree::new();
        tree.add_at(&["foobar"], "This value is not valid.");
        tree.reconcile(&violations(&[("foobar", "Too short.")]), &registry());

        assert!(tree.has_errors());
        let result = tree.into_result();
        assert_eq!(result.children().len(), 1);
        assert_eq!(
            result.child("foobar").unwrap().errors(),
            ["This value is not valid.", "Too short."]
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = ErrorTree::new();
        assert!(!tree.has_errors());
        assert_eq!(tree.into_result(), MappingResult::new("", vec![], vec![]));
    }
}

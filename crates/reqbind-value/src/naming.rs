//! Field name conventions
//!
//! Declared fields use underscored names (`private_bar`) while structural
//! property names and validation paths use the compact camel form
//! (`privateBar`). These helpers convert between the two.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9]+").unwrap_or_else(|e| panic!("invalid static pattern: {e}"))
});

/// Convert an underscored name to its camel form.
///
/// `private_bar` becomes `privateBar`; names without underscores only get
/// their first character lowercased.
#[must_use]
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;

    for ch in name.chars() {
        if ch == '_' || ch == ' ' {
            upper_next = true;
            continue;
        }

        if upper_next {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        upper_next = false;
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a camel name to its underscored form.
///
/// Every ASCII uppercase letter preceded by a word character gets an
/// underscore in front of it, runs of non-alphanumeric characters collapse to
/// a single underscore and the result is lowercased.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let mut split = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;

    for ch in name.chars() {
        if ch.is_ascii_uppercase() && previous.is_some_and(|p| p.is_alphanumeric() || p == '_') {
            split.push('_');
        }
        split.push(ch);
        previous = Some(ch);
    }

    NON_ALPHANUMERIC
        .replace_all(&split, "_")
        .to_lowercase()
}

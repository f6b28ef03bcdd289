//! Message translation

use indexmap::IndexMap;
use std::collections::HashMap;

/// Placeholder → replacement map (`{{ limit }}` → `3`)
pub type Parameters = IndexMap<String, String>;

/// Placeholder carrying the pluralization count
pub const COUNT_PARAMETER: &str = "%count%";

/// Translates message ids
pub trait Translator {
    /// Translate `id` within `domain`, substituting `parameters`
    fn trans(&self, id: &str, parameters: &Parameters, domain: Option<&str>) -> String;
}

/// Substitute parameters into a template.
///
/// Templates may carry a singular and a plural form separated by `|`; the
/// singular form is used when the `%count%` parameter equals `1`, the last
/// form otherwise.
#[must_use]
pub fn render_message(template: &str, parameters: &Parameters) -> String {
    let chosen = if template.contains('|') {
        let forms: Vec<&str> = template.split('|').collect();
        let singular = parameters
            .get(COUNT_PARAMETER)
            .is_some_and(|count| count.trim() == "1");
        if singular {
            forms[0]
        } else {
            forms[forms.len() - 1]
        }
    } else {
        template
    };

    parameters
        .iter()
        .fold(chosen.to_string(), |message, (key, value)| {
            message.replace(key, value)
        })
}

/// In-memory translation catalog keyed by domain and message id.
///
/// Unknown ids fall back to the id itself, rendered with its parameters.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    domains: HashMap<String, HashMap<String, String>>,
}

const DEFAULT_CATALOG_DOMAIN: &str = "messages";

impl MessageCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a translation
    #[must_use]
    pub fn with_message(
        mut self,
        domain: impl Into<String>,
        id: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        self.add(domain, id, translation);
        self
    }

    /// Register a translation in place
    pub fn add(
        &mut self,
        domain: impl Into<String>,
        id: impl Into<String>,
        translation: impl Into<String>,
    ) {
        self.domains
            .entry(domain.into())
            .or_default()
            .insert(id.into(), translation.into());
    }

    /// Whether a translation exists
    #[must_use]
    pub fn has(&self, id: &str, domain: &str) -> bool {
        self.domains
            .get(domain)
            .is_some_and(|messages| messages.contains_key(id))
    }
}

impl Translator for MessageCatalog {
    fn trans(&self, id: &str, parameters: &Parameters, domain: Option<&str>) -> String {
        let domain = domain.unwrap_or(DEFAULT_CATALOG_DOMAIN);
        let template = self
            .domains
            .get(domain)
            .and_then(|messages| messages.get(id))
            .map_or(id, String::as_str);

        render_message(template, parameters)
    }
}

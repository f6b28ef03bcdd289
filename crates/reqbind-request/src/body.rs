//! Body decoding

use crate::adapter::RequestAdapter;
use crate::{Error, Result};
use reqbind_value::{Value, ValueMap};
use tracing::trace;

/// Decodes body parameters from a request
pub trait BodyConverter {
    /// Decode the body into a parameter map.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` when the body cannot be decoded.
    fn decode(&self, request: &dyn RequestAdapter) -> Result<ValueMap>;
}

/// Decodes JSON bodies; other content types use the adapter's native params
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyConverter;

impl JsonBodyConverter {
    /// Create a new converter
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_json(content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        essence == "application/json" || essence.ends_with("+json")
    }
}

impl BodyConverter for JsonBodyConverter {
    fn decode(&self, request: &dyn RequestAdapter) -> Result<ValueMap> {
        let is_json = request
            .content_type()
            .is_some_and(|ct| Self::is_json(&ct));
        if !is_json {
            return Ok(request.request_params());
        }

        let content = request.content();
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(ValueMap::new());
        }

        trace!(bytes = content.len(), "Decoding JSON request body");
        let json: serde_json::Value =
            serde_json::from_slice(content).map_err(|e| Error::decode(e.to_string()))?;

        match Value::from_json(json) {
            Value::Map(map) => Ok(map),
            other => Err(Error::decode(format!(
                "expected a JSON object, found {}",
                other.type_name()
            ))),
        }
    }
}

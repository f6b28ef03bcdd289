//! Mapper configuration options

use crate::Result;
use serde::Deserialize;

pub const DEFAULT_POST_MAX_SIZE: &str = "8M";
pub const EXTRA_FIELDS_MESSAGE: &str = "The request should not contain extra fields.";
pub const UPLOAD_SIZE_MESSAGE: &str =
    "The uploaded file was too large. Please try to upload a smaller file.";

/// Configuration for data mappers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Maximum body size for body-bearing methods, e.g. `8M`, `512k`,
    /// `0x100000`; empty means unlimited (default: `8M`)
    pub post_max_size: String,
    /// Domain used to translate mapper messages (default: `validators`)
    pub translation_domain: String,
    /// Root error reported for undeclared keys
    pub extra_fields_message: String,
    /// Root error reported when the body is too large
    pub upload_size_message: String,
    /// Default message for fields whose value could not be transformed
    pub invalid_message: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            post_max_size: DEFAULT_POST_MAX_SIZE.to_string(),
            translation_domain: reqbind_validation::DEFAULT_DOMAIN.to_string(),
            extra_fields_message: EXTRA_FIELDS_MESSAGE.to_string(),
            upload_size_message: UPLOAD_SIZE_MESSAGE.to_string(),
            invalid_message: crate::field::DEFAULT_INVALID_MESSAGE.to_string(),
        }
    }
}

impl MapperConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Set the body size limit
    pub fn with_post_max_size(mut self, limit: impl Into<String>) -> Self {
        self.post_max_size = limit.into();
        self
    }

    /// Set the translation domain
    pub fn with_translation_domain(mut self, domain: impl Into<String>) -> Self {
        self.translation_domain = domain.into();
        self
    }

    /// Set the extra fields message
    pub fn with_extra_fields_message(mut self, message: impl Into<String>) -> Self {
        self.extra_fields_message = message.into();
        self
    }

    /// Set the body size message
    pub fn with_upload_size_message(mut self, message: impl Into<String>) -> Self {
        self.upload_size_message = message.into();
        self
    }

    /// Set the default invalid-value message
    pub fn with_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = message.into();
        self
    }

    /// Body size limit in bytes, `None` when unlimited
    pub fn post_max_bytes(&self) -> Option<u64> {
        reqbind_request::parse_size_limit(&self.post_max_size)
    }
}

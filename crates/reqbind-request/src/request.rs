//! Server-side parsed request

use reqbind_value::{UploadedFile, Value, ValueMap};
use std::collections::HashMap;

/// A request whose query string, body parameters and uploads have already
/// been decoded by the hosting server
#[derive(Debug, Clone, Default)]
pub struct Request {
    method: String,
    query: ValueMap,
    request: ValueMap,
    files: ValueMap,
    headers: HashMap<String, String>,
    content: Vec<u8>,
    content_length: Option<u64>,
}

impl Request {
    /// Create a request with the given method
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            ..Self::default()
        }
    }

    /// Replace the query parameters
    #[must_use]
    pub fn with_query(mut self, query: ValueMap) -> Self {
        self.query = query;
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Replace the decoded body parameters
    #[must_use]
    pub fn with_params(mut self, params: ValueMap) -> Self {
        self.request = params;
        self
    }

    /// Add a decoded body parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request.insert(name.into(), value.into());
        self
    }

    /// Add an uploaded file
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), Value::File(file));
        self
    }

    /// Replace the uploaded files tree (nested maps of files are allowed)
    #[must_use]
    pub fn with_files(mut self, files: ValueMap) -> Self {
        self.files = files;
        self
    }

    /// Set a header; names are case-insensitive
    #[must_use]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the raw body
    #[must_use]
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// Override the announced content length
    #[must_use]
    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Request method, uppercased
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Query parameters
    #[must_use]
    pub fn query(&self) -> &ValueMap {
        &self.query
    }

    /// Decoded body parameters
    #[must_use]
    pub fn params(&self) -> &ValueMap {
        &self.request
    }

    /// Uploaded files
    #[must_use]
    pub fn files(&self) -> &ValueMap {
        &self.files
    }

    /// Header value by case-insensitive name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Announced content length.
    ///
    /// An explicit override wins, then the `Content-Length` header, then the
    /// raw body length.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.content_length
            .or_else(|| {
                self.header("content-length")
                    .and_then(|v| v.trim().parse().ok())
            })
            .unwrap_or(self.content.len() as u64)
    }
}

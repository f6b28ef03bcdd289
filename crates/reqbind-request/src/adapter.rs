//! Request adapters

use crate::request::Request;
use crate::{Error, Result};
use reqbind_value::{Value, ValueMap};

/// Uniform read-only view over a request
pub trait RequestAdapter {
    /// Request method, uppercased
    fn request_method(&self) -> String;

    /// Decoded query string parameters
    fn query_params(&self) -> ValueMap;

    /// Natively decoded body parameters
    fn request_params(&self) -> ValueMap;

    /// Uploaded files, possibly nested
    fn all_files(&self) -> ValueMap;

    /// Announced body length in bytes
    fn request_content_length(&self) -> u64;

    /// `Content-Type` header, if any
    fn content_type(&self) -> Option<String>;

    /// Raw body
    fn content(&self) -> &[u8];

    /// Whether the query string carries `name`
    fn has_query_param(&self, name: &str) -> bool {
        self.query_params().contains_key(name)
    }

    /// Whether the decoded body carries `name`
    fn has_request_param(&self, name: &str) -> bool {
        self.request_params().contains_key(name)
    }

    /// Whether an upload named `name` exists
    fn has_file(&self, name: &str) -> bool {
        self.all_files().contains_key(name)
    }

    /// Query parameter by name
    fn query_param(&self, name: &str) -> Option<Value> {
        self.query_params().get(name).cloned()
    }

    /// Upload by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` when no upload has that name.
    fn file(&self, name: &str) -> Result<Value> {
        self.all_files()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::FileNotFound(name.to_string()))
    }
}

/// Adapter over a server-side parsed `Request`
#[derive(Debug, Clone, Copy)]
pub struct ServerRequestAdapter<'a> {
    request: &'a Request,
}

impl<'a> ServerRequestAdapter<'a> {
    /// Wrap a request
    #[must_use]
    pub fn new(request: &'a Request) -> Self {
        Self { request }
    }
}

impl RequestAdapter for ServerRequestAdapter<'_> {
    fn request_method(&self) -> String {
        self.request.method().to_string()
    }

    fn query_params(&self) -> ValueMap {
        self.request.query().clone()
    }

    fn request_params(&self) -> ValueMap {
        self.request.params().clone()
    }

    fn all_files(&self) -> ValueMap {
        self.request.files().clone()
    }

    fn request_content_length(&self) -> u64 {
        self.request.content_length()
    }

    fn content_type(&self) -> Option<String> {
        self.request.header("content-type").map(str::to_string)
    }

    fn content(&self) -> &[u8] {
        self.request.content()
    }

    fn has_query_param(&self, name: &str) -> bool {
        self.request.query().contains_key(name)
    }

    fn has_request_param(&self, name: &str) -> bool {
        self.request.params().contains_key(name)
    }

    fn has_file(&self, name: &str) -> bool {
        self.request.files().contains_key(name)
    }
}

/// Adapter over a raw `http::Request` message.
///
/// The query string is decoded from the URI and url-encoded bodies are
/// decoded from the raw content. Multipart bodies are not decoded, so such
/// messages expose no files.
#[derive(Debug, Clone, Copy)]
pub struct HttpMessageAdapter<'a> {
    request: &'a http::Request<Vec<u8>>,
}

impl<'a> HttpMessageAdapter<'a> {
    /// Wrap an HTTP message
    #[must_use]
    pub fn new(request: &'a http::Request<Vec<u8>>) -> Self {
        Self { request }
    }

    fn header(&self, name: http::header::HeaderName) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }
}

fn parse_urlencoded(input: &[u8]) -> ValueMap {
    url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

impl RequestAdapter for HttpMessageAdapter<'_> {
    fn request_method(&self) -> String {
        self.request.method().as_str().to_uppercase()
    }

    fn query_params(&self) -> ValueMap {
        self.request
            .uri()
            .query()
            .map(|q| parse_urlencoded(q.as_bytes()))
            .unwrap_or_default()
    }

    fn request_params(&self) -> ValueMap {
        let is_form = self
            .header(http::header::CONTENT_TYPE)
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            parse_urlencoded(self.request.body())
        } else {
            ValueMap::new()
        }
    }

    fn all_files(&self) -> ValueMap {
        ValueMap::new()
    }

    fn request_content_length(&self) -> u64 {
        self.header(http::header::CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(self.request.body().len() as u64)
    }

    fn content_type(&self) -> Option<String> {
        self.header(http::header::CONTENT_TYPE).map(str::to_string)
    }

    fn content(&self) -> &[u8] {
        self.request.body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqbind_value::UploadedFile;

    #[test]
    fn test_server_request_adapter() {
        let file = UploadedFile::new("a.png", "/tmp/a.png");
        let request = Request::new("POST")
            .with_param("foobar", "test")
            .with_query_param("page", "1")
            .with_file("avatar", file.clone());
        let adapter = ServerRequestAdapter::new(&request);

        assert_eq!(adapter.request_method(), "POST");
        assert!(adapter.has_request_param("foobar"));
        assert!(adapter.has_query_param("page"));
        assert_eq!(adapter.query_param("page"), Some(Value::from("1")));
        assert_eq!(adapter.file("avatar").unwrap(), Value::File(file));
        assert_eq!(
            adapter.file("missing").unwrap_err(),
            Error::FileNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_http_message_adapter() {
        let request = http::Request::builder()
            .method("PATCH")
            .uri("/users/1?tag=a&page=2")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(b"name=John+Doe&city=Z%C3%BCrich".to_vec())
            .unwrap();
        let adapter = HttpMessageAdapter::new(&request);

        assert_eq!(adapter.request_method(), "PATCH");
        assert_eq!(adapter.query_param("page"), Some(Value::from("2")));
        let params = adapter.request_params();
        assert_eq!(params.get("name"), Some(&Value::from("John Doe")));
        assert_eq!(params.get("city"), Some(&Value::from("Zürich")));
        assert_eq!(adapter.request_content_length(), 30);
        assert!(adapter.all_files().is_empty());
        assert!(!adapter.has_file("avatar"));
    }

    #[test]
    fn test_http_message_json_body_is_not_native_params() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .header("content-length", "1024")
            .body(b"{\"a\":1}".to_vec())
            .unwrap();
        let adapter = HttpMessageAdapter::new(&request);

        assert!(adapter.request_params().is_empty());
        assert_eq!(adapter.request_content_length(), 1024);
        assert_eq!(adapter.content_type().as_deref(), Some("application/json"));
    }
}

//! Adapter factory

use crate::adapter::{HttpMessageAdapter, RequestAdapter, ServerRequestAdapter};
use crate::request::Request;
use crate::{Error, Result};
use std::any::{Any, type_name};

/// Creates request adapters for the request kinds it recognizes
pub trait AdapterFactory {
    /// Wrap `request` in an adapter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` when the request kind is unsupported.
    fn create_request_adapter<'a>(
        &self,
        request: &'a dyn Any,
    ) -> Result<Box<dyn RequestAdapter + 'a>>;
}

/// Recognizes `Request` and `http::Request<Vec<u8>>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAdapterFactory;

impl DefaultAdapterFactory {
    /// Create a new factory
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AdapterFactory for DefaultAdapterFactory {
    fn create_request_adapter<'a>(
        &self,
        request: &'a dyn Any,
    ) -> Result<Box<dyn RequestAdapter + 'a>> {
        if let Some(request) = request.downcast_ref::<Request>() {
            return Ok(Box::new(ServerRequestAdapter::new(request)));
        }

        if let Some(request) = request.downcast_ref::<http::Request<Vec<u8>>>() {
            return Ok(Box::new(HttpMessageAdapter::new(request)));
        }

        Err(Error::invalid_argument(format!(
            "Expected argument of type \"{}\" or \"{}\", unsupported request type given",
            type_name::<Request>(),
            type_name::<http::Request<Vec<u8>>>()
        )))
    }
}

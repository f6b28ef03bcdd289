#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # reqbind-request
//!
//! Read-only views over incoming HTTP requests.
//!
//! Mappers never look at a concrete request type. They ask an
//! `AdapterFactory` for a `RequestAdapter`, which exposes the method, query
//! parameters, decoded body parameters, uploaded files and content length in
//! a uniform way. Two request kinds are supported out of the box: the
//! server-side parsed `Request` and raw `http::Request<Vec<u8>>` messages.

pub mod adapter;
pub mod body;
pub mod factory;
pub mod request;
pub mod size;

pub use adapter::{HttpMessageAdapter, RequestAdapter, ServerRequestAdapter};
pub use body::{BodyConverter, JsonBodyConverter};
pub use factory::{AdapterFactory, DefaultAdapterFactory};
pub use request::Request;
pub use size::{exceeds_limit, parse_size_limit};

use thiserror::Error;

/// Errors that can occur while reading requests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File \"{0}\" does not exist in the request")]
    FileNotFound(String),

    #[error("Body decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Build an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Build a body decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

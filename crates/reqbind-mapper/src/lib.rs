#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # reqbind-mapper
//!
//! Binds request data onto target objects.
//!
//! A `DataMapper` owns a target and the set of fields it may write. Each call
//! to `map` extracts data from the request (query string for safe methods,
//! body and uploads otherwise), writes the declared fields through a
//! `DataAccessor`, validates the target and folds every problem into a single
//! `MappingResult` tree carried by a `MappingError`.
//!
//! ## Example Usage
//!
//! ```rust
//! use reqbind_mapper::{DataMapper, Error};
//! use reqbind_request::Request;
//! use reqbind_value::{Object, ObjectRef, Value};
//!
//! let target = ObjectRef::new(Object::new("User").with_property("name", ""));
//! let mut mapper = DataMapper::new(target.clone(), ["name"]);
//!
//! let request = Request::new("POST")
//!     .with_param("name", "Alice")
//!     .with_param("admin", true);
//!
//! match mapper.map(&request) {
//!     Err(Error::Mapping(err)) => {
//!         assert_eq!(err.result().errors(), ["The request should not contain extra fields."]);
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! assert_eq!(target.get("name"), Some(Value::from("Alice")));
//! ```

pub mod accessor;
pub mod config;
pub mod error;
pub mod extractor;
pub mod factory;
pub mod field;
pub mod mapper;
pub mod reconcile;
pub mod registry;
pub mod result;
pub mod transformer;
pub mod write_back;

pub use accessor::{CallbackAccessor, ChainAccessor, DataAccessor, PropertyPathAccessor};
pub use config::MapperConfig;
pub use error::{AccessError, MappingError, TransformationFailed};
pub use extractor::{DataExtractor, ExtractedData, RequestDataExtractor};
pub use factory::DataMapperFactory;
pub use field::{Field, Getter, Setter};
pub use mapper::DataMapper;
pub use reconcile::ErrorTree;
pub use registry::FieldRegistry;
pub use result::MappingResult;
pub use transformer::{
    BooleanTransformer, DataTransformer, DateTimeTransformer, IntegerTransformer,
};
pub use write_back::{WriteOutcome, write_fields};

use thiserror::Error;

/// Errors returned by mappers
#[derive(Error, Debug)]
pub enum Error {
    /// The request data was rejected; carries the full error tree
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Property access error: {0}")]
    Property(#[from] reqbind_value::Error),

    #[error("Request error: {0}")]
    Request(reqbind_request::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl From<reqbind_request::Error> for Error {
    fn from(err: reqbind_request::Error) -> Self {
        match err {
            reqbind_request::Error::InvalidArgument(message) => Self::InvalidArgument(message),
            other => Self::Request(other),
        }
    }
}

impl Error {
    /// The error tree, when the data was rejected
    #[must_use]
    pub fn mapping_result(&self) -> Option<&MappingResult> {
        match self {
            Self::Mapping(err) => Some(err.result()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

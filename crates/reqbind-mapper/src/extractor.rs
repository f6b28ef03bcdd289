//! Request data extraction

use crate::Result;
use crate::config::MapperConfig;
use crate::error::MappingError;
use crate::result::MappingResult;
use reqbind_request::{AdapterFactory, BodyConverter, RequestAdapter, exceeds_limit};
use reqbind_validation::{Parameters, Translator};
use reqbind_value::{ValueMap, replace_recursive};
use std::any::Any;
use std::rc::Rc;
use tracing::debug;

/// Data pulled out of a request for one `map` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedData {
    /// Parameter name → submitted value
    pub data: ValueMap,
    /// Whether keys without a declared field are tolerated
    pub allow_extra: bool,
}

impl ExtractedData {
    pub fn new(data: ValueMap, allow_extra: bool) -> Self {
        Self { data, allow_extra }
    }
}

/// Produces the data a mapper writes
pub trait DataExtractor {
    /// Extract the submitted data from `request`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Mapping` when the request is rejected as a whole and
    /// `Error::InvalidArgument` for unsupported request types.
    fn extract(&self, request: &dyn Any) -> Result<ExtractedData>;
}

/// Methods whose data travels in the query string
const SAFE_METHODS: [&str; 3] = ["GET", "HEAD", "TRACE"];

/// Method-aware extractor.
///
/// Safe methods read the query string and tolerate extra keys. Any other
/// method reads the decoded body with uploaded files merged over it, after
/// checking the announced content length against the configured limit.
pub struct RequestDataExtractor {
    adapter_factory: Rc<dyn AdapterFactory>,
    body_converter: Option<Rc<dyn BodyConverter>>,
    translator: Option<Rc<dyn Translator>>,
    post_max_size: String,
    upload_size_message: String,
    translation_domain: String,
}

impl RequestDataExtractor {
    pub fn new(adapter_factory: Rc<dyn AdapterFactory>, config: &MapperConfig) -> Self {
        Self {
            adapter_factory,
            body_converter: None,
            translator: None,
            post_max_size: config.post_max_size.clone(),
            upload_size_message: config.upload_size_message.clone(),
            translation_domain: config.translation_domain.clone(),
        }
    }

    #[must_use]
    pub fn with_body_converter(mut self, converter: Option<Rc<dyn BodyConverter>>) -> Self {
        self.body_converter = converter;
        self
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Option<Rc<dyn Translator>>) -> Self {
        self.translator = translator;
        self
    }

    fn too_large(&self) -> MappingError {
        let message = match &self.translator {
            Some(translator) => translator.trans(
                &self.upload_size_message,
                &Parameters::new(),
                Some(&self.translation_domain),
            ),
            None => self.upload_size_message.clone(),
        };
        MappingError::new(MappingResult::new("", vec![], vec![message]))
    }

    fn body_data(&self, adapter: &dyn RequestAdapter) -> Result<ValueMap> {
        let mut params = match &self.body_converter {
            Some(converter) => converter.decode(adapter)?,
            None => adapter.request_params(),
        };
        replace_recursive(&mut params, adapter.all_files());
        Ok(params)
    }
}

impl DataExtractor for RequestDataExtractor {
    fn extract(&self, request: &dyn Any) -> Result<ExtractedData> {
        let adapter = self.adapter_factory.create_request_adapter(request)?;
        let method = adapter.request_method();

        if SAFE_METHODS.contains(&method.as_str()) {
            return Ok(ExtractedData::new(adapter.query_params(), true));
        }

        let content_length = adapter.request_content_length();
        if exceeds_limit(&self.post_max_size, content_length) {
            debug!(
                content_length,
                limit = %self.post_max_size,
                "Request body exceeds the size limit"
            );
            return Err(self.too_large().into());
        }

        Ok(ExtractedData::new(self.body_data(adapter.as_ref())?, false))
    }
}

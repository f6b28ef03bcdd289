//! The request data mapper

use crate::Result;
use crate::accessor::{ChainAccessor, DataAccessor};
use crate::config::MapperConfig;
use crate::error::MappingError;
use crate::extractor::{DataExtractor, RequestDataExtractor};
use crate::field::Field;
use crate::reconcile::ErrorTree;
use crate::registry::FieldRegistry;
use crate::write_back::write_fields;
use reqbind_request::{AdapterFactory, BodyConverter, DefaultAdapterFactory, JsonBodyConverter};
use reqbind_validation::{MetadataRegistry, Translator, Validator, ValidatorBuilder};
use reqbind_value::{GraphPropertyAccessor, PropertyAccessor, Value};
use std::any::Any;
use std::rc::Rc;
use tracing::debug;

/// Maps request data onto a target.
///
/// Collaborators that are not injected are created on first use and kept for
/// the lifetime of the mapper. The default extractor is the exception: it is
/// assembled on every call from the kept adapter factory and body converter,
/// so it always sees the current translator.
pub struct DataMapper {
    target: Value,
    registry: FieldRegistry,
    config: MapperConfig,
    metadata: MetadataRegistry,
    adapter_factory: Option<Rc<dyn AdapterFactory>>,
    body_converter: Option<Rc<dyn BodyConverter>>,
    property_accessor: Option<Rc<dyn PropertyAccessor>>,
    accessor: Option<Rc<dyn DataAccessor>>,
    validator: Option<Rc<dyn Validator>>,
    translator: Option<Rc<dyn Translator>>,
    extractor: Option<Rc<dyn DataExtractor>>,
}

impl DataMapper {
    /// Mapper writing `fields` into `target`
    pub fn new<F: Into<Field>>(target: impl Into<Value>, fields: impl IntoIterator<Item = F>) -> Self {
        Self {
            target: target.into(),
            registry: FieldRegistry::new(fields),
            config: MapperConfig::default(),
            metadata: MetadataRegistry::new(),
            adapter_factory: None,
            body_converter: None,
            property_accessor: None,
            accessor: None,
            validator: None,
            translator: None,
            extractor: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Constraint metadata for the default validator
    #[must_use]
    pub fn with_metadata(mut self, metadata: MetadataRegistry) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_adapter_factory(mut self, factory: Rc<dyn AdapterFactory>) -> Self {
        self.adapter_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn with_body_converter(mut self, converter: Rc<dyn BodyConverter>) -> Self {
        self.body_converter = Some(converter);
        self
    }

    /// Structural accessor used by the default field accessor
    #[must_use]
    pub fn with_property_accessor(mut self, accessor: Rc<dyn PropertyAccessor>) -> Self {
        self.property_accessor = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_accessor(mut self, accessor: Rc<dyn DataAccessor>) -> Self {
        self.accessor = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Rc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn with_translator(mut self, translator: Rc<dyn Translator>) -> Self {
        self.set_translator(translator);
        self
    }

    /// Replace how data is pulled out of requests
    #[must_use]
    pub fn with_extractor(mut self, extractor: Rc<dyn DataExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Translate mapper and validation messages.
    ///
    /// The upload size message uses the new translator from the next call on.
    /// A default validator created by an earlier call keeps the translator it
    /// was built with.
    pub fn set_translator(&mut self, translator: Rc<dyn Translator>) {
        self.translator = Some(translator);
    }

    #[must_use]
    pub fn target(&self) -> &Value {
        &self.target
    }

    #[must_use]
    pub fn fields(&self) -> &FieldRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Map `request` onto the target.
    ///
    /// Fields are written before validation runs, so the target keeps the
    /// submitted values even when the call fails.
    ///
    /// # Errors
    ///
    /// - `Error::Mapping` when the data is rejected; the result tree holds
    ///   every problem found
    /// - `Error::InvalidArgument` when the request type is not supported
    /// - `Error::Access` or `Error::Property` on accessor misconfiguration
    pub fn map(&mut self, request: &dyn Any) -> Result<()> {
        let extracted = self.extractor().extract(request)?;
        let accessor = self.accessor();

        let outcome = write_fields(
            &mut self.target,
            extracted.data,
            &self.registry,
            accessor.as_ref(),
            &self.config.invalid_message,
        )?;

        let mut tree = ErrorTree::new();
        for (field, message) in outcome.invalid {
            tree.add_at(&[field], message);
        }

        let violations = self.validator().validate(&self.target);
        tree.reconcile(&violations, &self.registry);

        if !outcome.extra.is_empty() && !extracted.allow_extra {
            tree.add_root_error(self.config.extra_fields_message.clone());
        }

        if tree.has_errors() {
            let result = tree.into_result();
            debug!(
                errors = result.error_count(),
                violations = violations.len(),
                "Mapping failed"
            );
            return Err(MappingError::new(result).into());
        }

        Ok(())
    }

    fn adapter_factory(&mut self) -> Rc<dyn AdapterFactory> {
        self.adapter_factory
            .get_or_insert_with(|| Rc::new(DefaultAdapterFactory::new()))
            .clone()
    }

    fn body_converter(&mut self) -> Rc<dyn BodyConverter> {
        self.body_converter
            .get_or_insert_with(|| Rc::new(JsonBodyConverter::new()))
            .clone()
    }

    fn extractor(&mut self) -> Rc<dyn DataExtractor> {
        if let Some(extractor) = &self.extractor {
            return extractor.clone();
        }

        Rc::new(
            RequestDataExtractor::new(self.adapter_factory(), &self.config)
                .with_body_converter(Some(self.body_converter()))
                .with_translator(self.translator.clone()),
        )
    }

    fn accessor(&mut self) -> Rc<dyn DataAccessor> {
        let property_accessor = &mut self.property_accessor;
        self.accessor
            .get_or_insert_with(|| {
                let property_accessor = property_accessor
                    .get_or_insert_with(|| Rc::new(GraphPropertyAccessor::new()))
                    .clone();
                Rc::new(ChainAccessor::with_property_accessor(property_accessor))
            })
            .clone()
    }

    fn validator(&mut self) -> Rc<dyn Validator> {
        let metadata = &self.metadata;
        let translator = &self.translator;
        let domain = &self.config.translation_domain;
        self.validator
            .get_or_insert_with(|| {
                let mut builder = ValidatorBuilder::new()
                    .with_metadata(metadata.clone())
                    .set_translation_domain(domain.clone());
                if let Some(translator) = translator {
                    builder = builder.set_translator(translator.clone());
                }
                Rc::new(builder.build())
            })
            .clone()
    }
}

//! Mapper factory

use crate::config::MapperConfig;
use crate::field::Field;
use crate::mapper::DataMapper;
use reqbind_request::{AdapterFactory, BodyConverter};
use reqbind_validation::{MetadataRegistry, Translator, Validator};
use reqbind_value::{PropertyAccessor, Value};
use std::rc::Rc;

/// Creates mappers sharing the same collaborators
#[derive(Default, Clone)]
pub struct DataMapperFactory {
    config: MapperConfig,
    metadata: MetadataRegistry,
    translator: Option<Rc<dyn Translator>>,
    adapter_factory: Option<Rc<dyn AdapterFactory>>,
    body_converter: Option<Rc<dyn BodyConverter>>,
    property_accessor: Option<Rc<dyn PropertyAccessor>>,
    validator: Option<Rc<dyn Validator>>,
}

impl DataMapperFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, config: MapperConfig) {
        self.config = config;
    }

    pub fn set_metadata(&mut self, metadata: MetadataRegistry) {
        self.metadata = metadata;
    }

    pub fn set_translator(&mut self, translator: Option<Rc<dyn Translator>>) {
        self.translator = translator;
    }

    pub fn set_adapter_factory(&mut self, factory: Option<Rc<dyn AdapterFactory>>) {
        self.adapter_factory = factory;
    }

    pub fn set_body_converter(&mut self, converter: Option<Rc<dyn BodyConverter>>) {
        self.body_converter = converter;
    }

    pub fn set_property_accessor(&mut self, accessor: Option<Rc<dyn PropertyAccessor>>) {
        self.property_accessor = accessor;
    }

    pub fn set_validator(&mut self, validator: Option<Rc<dyn Validator>>) {
        self.validator = validator;
    }

    /// Mapper writing `fields` of `target` through property paths
    pub fn create_property_accessor_mapper<F: Into<Field>>(
        &self,
        target: impl Into<Value>,
        fields: impl IntoIterator<Item = F>,
    ) -> DataMapper {
        let mut mapper = DataMapper::new(target, fields)
            .with_config(self.config.clone())
            .with_metadata(self.metadata.clone());

        if let Some(factory) = &self.adapter_factory {
            mapper = mapper.with_adapter_factory(factory.clone());
        }
        if let Some(converter) = &self.body_converter {
            mapper = mapper.with_body_converter(converter.clone());
        }
        if let Some(accessor) = &self.property_accessor {
            mapper = mapper.with_property_accessor(accessor.clone());
        }
        if let Some(validator) = &self.validator {
            mapper = mapper.with_validator(validator.clone());
        }
        if let Some(translator) = &self.translator {
            mapper = mapper.with_translator(translator.clone());
        }

        mapper
    }
}

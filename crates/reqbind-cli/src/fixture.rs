//! YAML fixtures describing a mapping target and a request
//!
//! A mapping fixture declares the target object graph, the fields to map,
//! property constraints per class and an optional message catalog:
//!
//! ```yaml
//! target:
//!   class: Profile
//!   properties:
//!     name: Bob
//!     age: null
//!     address:
//!       class: Address
//!       properties: { city: Paris }
//!   read_only: [id]
//! fields:
//!   - name
//!   - { name: age, transformer: integer }
//! constraints:
//!   Profile:
//!     name: [{ type: not_blank }, { type: length, min: 2 }]
//!     address: [{ type: valid }]
//! translations:
//!   validators:
//!     "This value should not be blank.": "Required."
//! ```
//!
//! A request fixture lists the method and the data a request carries.

use indexmap::IndexMap;
use reqbind_mapper::{BooleanTransformer, DateTimeTransformer, Field, IntegerTransformer};
use reqbind_request::Request;
use reqbind_validation::{ClassMetadata, Constraint, MessageCatalog, MetadataRegistry};
use reqbind_value::{Object, ObjectRef, Property, PropertyPath, UploadedFile, Value, ValueMap};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors turning a parsed fixture into runtime values
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Property '{property}' of class '{class}' is marked read-only but not declared")]
    UnknownReadOnly { class: String, property: String },

    #[error("Invalid property path for field '{field}': {source}")]
    InvalidPath {
        field: String,
        source: reqbind_value::Error,
    },

    #[error("Invalid constraint on {class}.{property}: {source}")]
    InvalidConstraint {
        class: String,
        property: String,
        source: reqbind_validation::Error,
    },

    #[error("Value cannot be represented: {0}")]
    Value(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FixtureError>;

fn default_true() -> bool {
    true
}

fn default_method() -> String {
    "GET".to_string()
}

/// Target graph, fields, constraints and translations
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingFixture {
    pub target: ObjectSpec,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub constraints: IndexMap<String, IndexMap<String, Vec<ConstraintSpec>>>,
    #[serde(default)]
    pub translations: IndexMap<String, IndexMap<String, String>>,
}

impl MappingFixture {
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Build the target object graph
    pub fn build_target(&self) -> Result<ObjectRef> {
        self.target.build()
    }

    pub fn build_fields(&self) -> Result<Vec<Field>> {
        self.fields.iter().map(FieldSpec::build).collect()
    }

    pub fn build_metadata(&self) -> Result<MetadataRegistry> {
        let mut registry = MetadataRegistry::new();
        for (class, properties) in &self.constraints {
            let mut metadata = ClassMetadata::new(class.as_str());
            for (property, constraints) in properties {
                for spec in constraints {
                    let constraint =
                        spec.build().map_err(|source| FixtureError::InvalidConstraint {
                            class: class.clone(),
                            property: property.clone(),
                            source,
                        })?;
                    metadata = metadata.add_property_constraint(property.as_str(), constraint);
                }
            }
            registry.register(metadata);
        }
        Ok(registry)
    }

    /// Message catalog, `None` when the fixture declares no translations
    pub fn build_catalog(&self) -> Option<MessageCatalog> {
        if self.translations.is_empty() {
            return None;
        }

        let mut catalog = MessageCatalog::new();
        for (domain, messages) in &self.translations {
            for (id, translation) in messages {
                catalog.add(domain.as_str(), id.as_str(), translation.as_str());
            }
        }
        Some(catalog)
    }
}

/// An object: a class name and its properties
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    pub class: String,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,
    #[serde(default)]
    pub read_only: Vec<String>,
}

impl ObjectSpec {
    fn build(&self) -> Result<ObjectRef> {
        if let Some(unknown) = self
            .read_only
            .iter()
            .find(|name| !self.properties.contains_key(name.as_str()))
        {
            return Err(FixtureError::UnknownReadOnly {
                class: self.class.clone(),
                property: unknown.clone(),
            });
        }

        let mut object = Object::new(self.class.as_str());
        for (name, spec) in &self.properties {
            let mut property = Property::new(spec.to_value()?);
            if self.read_only.contains(name) {
                property = property.read_only();
            }
            object = object.with_slot(name.as_str(), property);
        }
        Ok(ObjectRef::new(object))
    }
}

/// A property value: a nested object or any plain YAML value
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PropertySpec {
    Object(ObjectSpec),
    Plain(serde_yaml::Value),
}

impl PropertySpec {
    fn to_value(&self) -> Result<Value> {
        match self {
            Self::Object(spec) => Ok(Value::Object(spec.build()?)),
            Self::Plain(yaml) => yaml_to_value(yaml),
        }
    }
}

fn yaml_to_value(yaml: &serde_yaml::Value) -> Result<Value> {
    Ok(Value::from_json(serde_json::to_value(yaml)?))
}

fn yaml_map(entries: &IndexMap<String, serde_yaml::Value>) -> Result<ValueMap> {
    entries
        .iter()
        .map(|(key, value)| Ok((key.clone(), yaml_to_value(value)?)))
        .collect()
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerKind {
    Integer,
    Boolean,
    Datetime,
}

/// A field name, or a name with options
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Name(String),
    Detailed(FieldOptions),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOptions {
    pub name: String,
    pub path: Option<String>,
    pub transformer: Option<TransformerKind>,
    /// Input format for the `datetime` transformer
    pub format: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub mapped: bool,
    #[serde(default = "default_true")]
    pub by_reference: bool,
    pub invalid_message: Option<String>,
}

impl FieldSpec {
    fn build(&self) -> Result<Field> {
        let options = match self {
            Self::Name(name) => return Ok(Field::new(name.as_str())),
            Self::Detailed(options) => options,
        };

        let mut field = Field::new(options.name.as_str())
            .disabled(options.disabled)
            .mapped(options.mapped)
            .by_reference(options.by_reference);

        if let Some(path) = &options.path {
            let path = PropertyPath::parse(path).map_err(|source| FixtureError::InvalidPath {
                field: options.name.clone(),
                source,
            })?;
            field = field.with_property_path(path);
        }

        field = match (options.transformer, &options.format) {
            (None, _) => field,
            (Some(TransformerKind::Integer), _) => field.with_transformer(IntegerTransformer),
            (Some(TransformerKind::Boolean), _) => field.with_transformer(BooleanTransformer),
            (Some(TransformerKind::Datetime), None) => {
                field.with_transformer(DateTimeTransformer::new())
            }
            (Some(TransformerKind::Datetime), Some(format)) => {
                field.with_transformer(DateTimeTransformer::with_format(format.as_str()))
            }
        };

        if let Some(message) = &options.invalid_message {
            field = field.with_invalid_message(message.as_str());
        }

        Ok(field)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintSpec {
    NotBlank {
        message: Option<String>,
    },
    NotNull {
        message: Option<String>,
    },
    Regex {
        pattern: String,
        #[serde(default = "default_true")]
        matches: bool,
        message: Option<String>,
    },
    Length {
        min: Option<usize>,
        max: Option<usize>,
        message: Option<String>,
    },
    Valid,
}

impl ConstraintSpec {
    fn build(&self) -> reqbind_validation::Result<Constraint> {
        let (constraint, message) = match self {
            Self::NotBlank { message } => (Constraint::not_blank(), message),
            Self::NotNull { message } => (Constraint::not_null(), message),
            Self::Regex {
                pattern,
                matches,
                message,
            } => {
                let constraint = Constraint::regex(pattern)?;
                let constraint = if *matches {
                    constraint
                } else {
                    constraint.not_matching()
                };
                (constraint, message)
            }
            Self::Length { min, max, message } => (Constraint::length(*min, *max)?, message),
            Self::Valid => return Ok(Constraint::valid()),
        };

        Ok(match message {
            Some(message) => constraint.with_message(message.as_str()),
            None => constraint,
        })
    }
}

/// The data a request carries
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestFixture {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub query: IndexMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub params: IndexMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub files: IndexMap<String, FileSpec>,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
    pub content_length: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    pub name: String,
    pub path: PathBuf,
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub error: u8,
}

impl RequestFixture {
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn build(&self) -> Result<Request> {
        let mut request = Request::new(self.method.as_str())
            .with_query(yaml_map(&self.query)?)
            .with_params(yaml_map(&self.params)?);

        for (name, spec) in &self.files {
            let mut file = UploadedFile::new(spec.name.as_str(), spec.path.clone())
                .with_size(spec.size)
                .with_error(spec.error);
            if let Some(mime_type) = &spec.mime_type {
                file = file.with_mime_type(mime_type.as_str());
            }
            request = request.with_file(name.as_str(), file);
        }

        for (name, value) in &self.headers {
            request = request.with_header(name, value.as_str());
        }
        if let Some(body) = &self.body {
            request = request.with_content(body.as_bytes());
        }
        if let Some(length) = self.content_length {
            request = request.with_content_length(length);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
target:
  class: Profile
  properties:
    id: 7
    name: Bob
    tags: [a, b]
    address:
      class: Address
      properties:
        city: Paris
  read_only: [id]
fields:
  - name
  - { name: age, transformer: integer, invalid_message: "Not a number." }
  - { name: city, path: address.city }
constraints:
  Profile:
    name:
      - { type: not_blank }
      - { type: length, min: 2, max: 10 }
    address: [{ type: valid }]
  Address:
    city: [{ type: regex, pattern: "^[A-Z]", message: "Capitalize." }]
translations:
  validators:
    "Capitalize.": "Großschreiben."
"#;

    #[test]
    fn test_builds_target_graph() {
        let fixture = MappingFixture::from_yaml_str(PROFILE).unwrap();
        let target = fixture.build_target().unwrap();

        assert_eq!(target.class(), "Profile");
        assert_eq!(target.get("name"), Some(Value::from("Bob")));
        assert_eq!(target.get("id"), Some(Value::Integer(7)));
        assert!(!target.borrow().property("id").unwrap().is_writable());
        assert_eq!(
            target.get("tags"),
            Some(Value::List(vec![Value::from("a"), Value::from("b")]))
        );

        let address = target.get("address").unwrap();
        let address = address.as_object().unwrap();
        assert_eq!(address.class(), "Address");
        assert_eq!(address.get("city"), Some(Value::from("Paris")));
    }

    #[test]
    fn test_builds_fields() {
        let fixture = MappingFixture::from_yaml_str(PROFILE).unwrap();
        let fields = fixture.build_fields().unwrap();

        assert_eq!(fields.len(), 3);
        assert!(fields[1].transformer().is_some());
        assert_eq!(fields[1].invalid_message(), Some("Not a number."));
        assert_eq!(
            fields[2].property_path().map(ToString::to_string),
            Some("address.city".to_string())
        );
    }

    #[test]
    fn test_builds_metadata_and_catalog() {
        let fixture = MappingFixture::from_yaml_str(PROFILE).unwrap();
        let metadata = fixture.build_metadata().unwrap();

        assert!(metadata.has("Profile"));
        assert!(metadata.has("Address"));
        assert_eq!(
            metadata.get("Profile").unwrap().constraints_for("name").len(),
            2
        );

        let catalog = fixture.build_catalog().unwrap();
        assert!(catalog.has("Capitalize.", "validators"));
    }

    #[test]
    fn test_unknown_read_only_property() {
        let fixture = MappingFixture::from_yaml_str(
            "target: { class: Foo, properties: { a: 1 }, read_only: [b] }\nfields: [a]\n",
        )
        .unwrap();

        let err = fixture.build_target().unwrap_err();
        assert!(matches!(err, FixtureError::UnknownReadOnly { .. }));
    }

    #[test]
    fn test_invalid_constraint_is_reported() {
        let fixture = MappingFixture::from_yaml_str(
            "target: { class: Foo }\nfields: [a]\nconstraints:\n  Foo:\n    a: [{ type: length }]\n",
        )
        .unwrap();

        let err = fixture.build_metadata().unwrap_err();
        assert!(err.to_string().starts_with("Invalid constraint on Foo.a"));
    }

    #[test]
    fn test_unknown_constraint_type_is_rejected() {
        let result = MappingFixture::from_yaml_str(
            "target: { class: Foo }\nfields: [a]\nconstraints:\n  Foo:\n    a: [{ type: email }]\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_builds_request() {
        let fixture = RequestFixture::from_yaml_str(
            r#"
method: post
params:
  name: Alice
  address: { city: Lyon }
files:
  avatar: { name: me.png, path: /tmp/upload-1, size: 12, mime_type: image/png }
headers:
  Content-Type: application/x-www-form-urlencoded
content_length: 42
"#,
        )
        .unwrap();

        let request = fixture.build().unwrap();
        assert_eq!(request.method(), "POST");
        assert_eq!(request.params().get("name"), Some(&Value::from("Alice")));
        assert!(matches!(request.params().get("address"), Some(Value::Map(_))));
        assert!(matches!(request.files().get("avatar"), Some(Value::File(_))));
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(request.content_length(), 42);
    }

    #[test]
    fn test_request_defaults_to_get() {
        let fixture = RequestFixture::from_yaml_str("query: { page: 2 }").unwrap();
        let request = fixture.build().unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.query().get("page"), Some(&Value::Integer(2)));
    }
}

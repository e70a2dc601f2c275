#![allow(non_snake_case)]

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Names of scopes required by each security scheme, keyed by scheme name
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Prefix that marks a key as a vendor extension
pub const VENDOR_EXTENSION_PREFIX: &str = "x-";

/// Represents a complete Swagger 2.0 document
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Swagger {
    #[serde(deserialize_with = "string_or_number")]
    pub swagger: String,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub basePath: Option<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub schemes: Vec<Scheme>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub consumes: Vec<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub produces: Vec<String>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub paths: IndexMap<String, PathItem>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub definitions: IndexMap<String, Schema>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub responses: IndexMap<String, Response>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub securityDefinitions: IndexMap<String, SecurityScheme>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub security: Vec<SecurityRequirement>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub externalDocs: Option<ExternalDocs>,
    /// Vendor extensions (`x-*`). Right after deserialization this also
    /// holds any unrecognised top-level keys, see [`Swagger::unknown_fields`].
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Swagger {
    /// Top-level keys that are neither modelled fields nor vendor extensions
    pub fn unknown_fields(&self) -> Vec<String> {
        self.extensions
            .keys()
            .filter(|key| !is_vendor_extension(key))
            .cloned()
            .collect()
    }

    /// Drop every top-level key that is not a vendor extension
    pub fn retain_vendor_extensions(&mut self) {
        self.extensions.retain(|key, _| is_vendor_extension(key));
    }

    /// Add a tag unless one with the same name is already present
    pub fn tag(&mut self, tag: Tag) {
        if self.tags.iter().any(|existing| existing.name == tag.name) {
            debug!("Tag already present, keeping existing: {}", tag.name);
            return;
        }
        debug!("Adding tag: {}", tag.name);
        self.tags.push(tag);
    }

    pub fn scheme(&mut self, scheme: Scheme) {
        self.schemes.push(scheme);
    }

    pub fn consumes(&mut self, media_type: String) {
        self.consumes.push(media_type);
    }

    pub fn produces(&mut self, media_type: String) {
        self.produces.push(media_type);
    }

    /// Add an alternative security requirement
    pub fn security(&mut self, requirement: SecurityRequirement) {
        self.security.push(requirement);
    }

    /// Insert a path item, replacing any existing item under the same key
    pub fn path(&mut self, key: String, item: PathItem) {
        if self.paths.contains_key(&key) {
            debug!("Replacing path: {}", key);
        } else {
            debug!("Adding path: {}", key);
        }
        self.paths.insert(key, item);
    }

    pub fn security_definition(&mut self, name: String, scheme: SecurityScheme) {
        debug!("Setting security definition: {}", name);
        self.securityDefinitions.insert(name, scheme);
    }

    pub fn definition(&mut self, name: String, schema: Schema) {
        debug!("Setting definition: {}", name);
        self.definitions.insert(name, schema);
    }

    pub fn parameter(&mut self, name: String, parameter: Parameter) {
        debug!("Setting parameter: {}", name);
        self.parameters.insert(name, parameter);
    }

    pub fn response(&mut self, name: String, response: Response) {
        debug!("Setting response: {}", name);
        self.responses.insert(name, response);
    }

    pub fn vendor_extension(&mut self, key: String, value: Value) {
        debug!("Setting vendor extension: {}", key);
        self.extensions.insert(key, value);
    }
}

pub fn is_vendor_extension(key: &str) -> bool {
    key.starts_with(VENDOR_EXTENSION_PREFIX)
}

/// An explicit `null` (or a bare YAML `paths:`) reads as an empty collection
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept unquoted YAML scalars such as `swagger: 2.0` or `version: 1`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

/// Transfer protocol of the API
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
    Ws,
    Wss,
}

/// Either a `$ref` object or an inline item
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> ReferenceOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            ReferenceOr::Item(item) => Some(item),
            ReferenceOr::Reference { .. } => None,
        }
    }
}

/// Information about the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Info {
    pub title: String,
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub termsOfService: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub license: Option<License>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Contact information for the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
}

/// License information for the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
}

/// External documentation for the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub url: String,
}

/// Tag information for API operations
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub externalDocs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// A single path item with all its operations
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PathItem {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none", default)]
    pub ref_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patch: Option<Operation>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub parameters: Vec<ReferenceOr<Parameter>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl PathItem {
    /// Operations defined on this path, keyed by lowercase HTTP method
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// An operation (endpoint) of the API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Operation {
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub externalDocs: Option<ExternalDocs>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operationId: Option<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub consumes: Vec<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub produces: Vec<String>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub parameters: Vec<ReferenceOr<Parameter>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responses: IndexMap<String, ReferenceOr<Response>>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub schemes: Vec<Scheme>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deprecated: Option<bool>,
    // `security: []` disables security for the operation, so absent and empty differ
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Parameter for an operation
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub in_type: String, // query, header, path, formData, body
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub required: Option<bool>,
    // Only for body parameters
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema: Option<Schema>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub allowEmptyValue: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collectionFormat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none", default)]
    pub enum_values: Option<Vec<Value>>,
    // Validation keywords (maximum, pattern, ...) and vendor extensions
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// API response
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Response {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema: Option<Schema>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub headers: IndexMap<String, Header>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub examples: IndexMap<String, Value>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Response header
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub collectionFormat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none", default)]
    pub enum_values: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Schema object, the Swagger 2.0 subset of JSON Schema draft 4
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none", default)]
    pub ref_: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub type_: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none", default)]
    pub enum_values: Option<Vec<Value>>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub required: Vec<String>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub properties: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub additionalProperties: Option<Value>, // Can be a boolean or Schema
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Schema>>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub allOf: Vec<Schema>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub discriminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub readOnly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub xml: Option<Xml>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub externalDocs: Option<ExternalDocs>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub example: Option<Value>,
    // Validation keywords (maximum, minLength, ...) and vendor extensions
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// XML object
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Xml {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attribute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub wrapped: Option<bool>,
}

/// Security scheme object (basic, apiKey or oauth2)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none", default)]
    pub in_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authorizationUrl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tokenUrl: Option<String>,
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        default,
        deserialize_with = "null_as_default"
    )]
    pub scopes: IndexMap<String, String>,
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::models::Swagger;

/// Why the content of an input file could not be turned into a document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported document version: {0} (expected Swagger 2.0)")]
    UnsupportedVersion(String),

    #[error("Unknown top-level fields: {}", .0.join(", "))]
    UnknownFields(Vec<String>),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// The input file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            LoadError::FileNotFound { path }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Text encoding of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension, falling back to sniffing the content
    pub fn detect(path: &Path, content: &str) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());
        match extension.as_deref() {
            Some("json") => DocumentFormat::Json,
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => {
                if content.trim_start().starts_with('{') {
                    DocumentFormat::Json
                } else {
                    DocumentFormat::Yaml
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop unrecognised top-level fields with a warning instead of failing
    pub tolerate_unknown_fields: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            tolerate_unknown_fields: true,
        }
    }
}

/// Load every document in order, stopping at the first failure.
///
/// The first document of the result is the base, the rest are overlays.
pub fn load_documents<P: AsRef<Path>>(
    paths: &[P],
    options: &LoadOptions,
) -> Result<Vec<Swagger>, LoadError> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(load_document(path.as_ref(), options)?);
    }
    Ok(documents)
}

/// Load a single Swagger 2.0 document from a JSON or YAML file
pub fn load_document(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Swagger, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = DocumentFormat::detect(path, &content);
    debug!("Parsing {:?} as {:?}", path, format);

    let swagger = parse_document(&content, format, options).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded {:?}: {} paths, {} definitions",
        path,
        swagger.paths.len(),
        swagger.definitions.len()
    );
    Ok(swagger)
}

/// Parse document text in the given format
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    options: &LoadOptions,
) -> Result<Swagger, ParseError> {
    let value = match format {
        DocumentFormat::Json => serde_json::from_str::<serde_json::Value>(content)?,
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            yaml_to_json(yaml)
        }
    };

    let mut swagger: Swagger = serde_json::from_value(value)?;

    if !swagger.swagger.starts_with("2.") {
        return Err(ParseError::UnsupportedVersion(swagger.swagger));
    }

    let unknown = swagger.unknown_fields();
    if !unknown.is_empty() {
        if !options.tolerate_unknown_fields {
            return Err(ParseError::UnknownFields(unknown));
        }
        warn!("Ignoring unknown top-level fields: {}", unknown.join(", "));
        swagger.retain_vendor_extensions();
    }

    Ok(swagger)
}

/// Convert a YAML value to JSON, turning non-string mapping keys
/// (e.g. unquoted `200:` response codes) into strings
fn yaml_to_json(value: serde_yaml::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Json::Number)
                    .unwrap_or(Json::Null)
            }
        }
        Yaml::String(s) => Json::String(s),
        Yaml::Sequence(items) => Json::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Json::Object(
            mapping
                .into_iter()
                .filter_map(|(key, value)| yaml_key(key).map(|key| (key, yaml_to_json(value))))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some("null".to_string()),
        other => {
            warn!("Skipping unsupported mapping key: {:?}", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReferenceOr, Scheme};
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const YAML_DOC: &str = r##"
swagger: "2.0"
info:
  title: Pets
  version: "1.0"
basePath: /v1
schemes:
  - https
paths:
  /pets:
    get:
      responses:
        200:
          description: A list of pets
          schema:
            type: array
            items:
              $ref: "#/definitions/Pet"
definitions:
  Pet:
    type: object
    required: [id]
    properties:
      id:
        type: integer
        format: int64
"##;

    #[test]
    fn test_parse_yaml_with_numeric_response_codes() {
        let swagger =
            parse_document(YAML_DOC, DocumentFormat::Yaml, &LoadOptions::default()).unwrap();

        assert_eq!(swagger.info.title, "Pets");
        assert_eq!(swagger.basePath.as_deref(), Some("/v1"));
        assert_eq!(swagger.schemes, vec![Scheme::Https]);

        let get = swagger.paths["/pets"].get.as_ref().unwrap();
        let ok = get.responses["200"].as_item().unwrap();
        assert_eq!(ok.description, "A list of pets");
        let items = ok.schema.as_ref().unwrap().items.as_ref().unwrap();
        assert_eq!(items.ref_.as_deref(), Some("#/definitions/Pet"));
        assert_eq!(swagger.definitions["Pet"].required, vec!["id".to_string()]);
    }

    #[test]
    fn test_parse_json_with_parameter_refs() {
        let content = r##"{
            "swagger": "2.0",
            "info": { "title": "Orders", "version": "2" },
            "paths": {
                "/orders": {
                    "parameters": [{ "$ref": "#/parameters/limit" }],
                    "post": { "responses": { "201": { "$ref": "#/responses/Created" } } }
                }
            },
            "parameters": {
                "limit": { "name": "limit", "in": "query", "type": "integer" }
            }
        }"##;
        let swagger =
            parse_document(content, DocumentFormat::Json, &LoadOptions::default()).unwrap();

        let item = &swagger.paths["/orders"];
        assert!(matches!(item.parameters[0], ReferenceOr::Reference { .. }));
        let post = item.post.as_ref().unwrap();
        assert_eq!(
            post.responses["201"],
            ReferenceOr::Reference {
                reference: "#/responses/Created".to_string()
            }
        );
        assert_eq!(swagger.parameters["limit"].in_type, "query");
    }

    #[test]
    fn test_rejects_openapi_3() {
        let content = r#"{ "swagger": "3.0", "info": { "title": "T", "version": "1" } }"#;
        let err = parse_document(content, DocumentFormat::Json, &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "3.0"));

        let content = r#"{ "openapi": "3.0.0", "info": { "title": "T", "version": "1" } }"#;
        let err = parse_document(content, DocumentFormat::Json, &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_unknown_fields_strict_and_tolerant() {
        let content = r#"{
            "swagger": "2.0",
            "info": { "title": "T", "version": "1" },
            "servers": [],
            "x-internal": true
        }"#;

        let strict = LoadOptions {
            tolerate_unknown_fields: false,
        };
        let err = parse_document(content, DocumentFormat::Json, &strict).unwrap_err();
        assert!(matches!(err, ParseError::UnknownFields(ref f) if f == &vec!["servers".to_string()]));

        let swagger =
            parse_document(content, DocumentFormat::Json, &LoadOptions::default()).unwrap();
        let keys: Vec<&str> = swagger.extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x-internal"]);
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            DocumentFormat::detect(Path::new("a.JSON"), "swagger: x"),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("a.yml"), "{}"),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("a.txt"), "  \n{\"swagger\": \"2.0\"}"),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::detect(Path::new("petstore"), "swagger: '2.0'"),
            DocumentFormat::Yaml
        );
    }

    #[test]
    fn test_load_documents_in_order() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("base.yaml");
        let overlay = dir.path().join("overlay.json");

        let mut file = File::create(&base).unwrap();
        write!(file, "{}", YAML_DOC).unwrap();
        let mut file = File::create(&overlay).unwrap();
        write!(
            file,
            r#"{{ "swagger": "2.0", "info": {{ "title": "Overlay", "version": "1" }} }}"#
        )
        .unwrap();

        let docs = load_documents(&[&base, &overlay], &LoadOptions::default()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].info.title, "Pets");
        assert_eq!(docs[1].info.title, "Overlay");
    }

    #[test]
    fn test_missing_file_is_reported_by_path() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("base.yaml");
        File::create(&base)
            .unwrap()
            .write_all(YAML_DOC.as_bytes())
            .unwrap();
        let missing = dir.path().join("missing.json");

        let err = load_documents(&[&base, &missing], &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
        assert_eq!(err.path(), missing.as_path());
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        File::create(&broken)
            .unwrap()
            .write_all(b"{ \"swagger\": ")
            .unwrap();

        let err = load_document(&broken, &LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                source: ParseError::Json(_),
                ..
            }
        ));
        assert_eq!(err.path(), broken.as_path());
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_relative_path_reported_as_given() {
        let err = load_document("no/such/overlay.json", &LoadOptions::default()).unwrap_err();
        assert_eq!(err.path(), Path::new("no/such/overlay.json"));
        assert_eq!(err.to_string(), "File not found: no/such/overlay.json");
    }
}

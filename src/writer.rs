use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::models::Swagger;

/// Default output file, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "result.json";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to serialize document to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize document to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// YAML for `.yaml`/`.yml` files, JSON otherwise
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub format: OutputFormat,
    /// Pretty-print JSON output; YAML is always block style
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

/// Serialize a document to text. Absent fields are omitted.
pub fn to_string(swagger: &Swagger, options: &WriteOptions) -> Result<String, WriteError> {
    let content = match options.format {
        OutputFormat::Json if options.pretty => serde_json::to_string_pretty(swagger)?,
        OutputFormat::Json => serde_json::to_string(swagger)?,
        OutputFormat::Yaml => serde_yaml::to_string(swagger)?,
    };
    Ok(content)
}

/// Serialize a document and write it to `path`.
///
/// Nothing is written unless serialization succeeds.
pub fn write_document(
    swagger: &Swagger,
    path: impl AsRef<Path>,
    options: &WriteOptions,
) -> Result<(), WriteError> {
    let path = path.as_ref();
    let mut content = to_string(swagger, options)?;
    if !content.ends_with('\n') {
        content.push('\n');
    }

    fs::write(path, content).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote combined document: {:?}", path);
    Ok(())
}

pub mod loader;
pub mod merger;
pub mod models;
pub mod writer;

pub use loader::{load_document, load_documents, LoadError, LoadOptions, ParseError};
pub use merger::{merge, MergeOptions, Merger};
pub use models::Swagger;
pub use writer::{write_document, OutputFormat, WriteError, WriteOptions};

//! Error taxonomy shared by every stage of the generation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while loading, normalizing, rendering or writing an SDK.
#[derive(Debug, Error)]
pub enum SdkgenError {
    /// A schema file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// GraphQL SDL text was rejected by the parser.
    #[error("invalid GraphQL schema in {}: {message}", path.display())]
    GraphqlParse { path: PathBuf, message: String },
    /// The same type name was declared more than once across the sources.
    #[error("type `{name}` is defined more than once")]
    DuplicateType { name: String },
    /// An `extend` definition targets a type that was never declared.
    #[error("cannot extend unknown type `{name}`")]
    UnknownExtension { name: String },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Only `.yaml`, `.yml` and `.json` OpenAPI documents are accepted.
    #[error("unsupported schema file extension: {}", path.display())]
    UnsupportedExtension { path: PathBuf },
    /// Raised in strict mode when any `$ref` pointed nowhere.
    #[error("unresolved schema references: {}", pointers.join(", "))]
    UnresolvedReferences { pointers: Vec<String> },
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
    /// The external source formatter failed or could not be run.
    #[error("formatter `{program}` failed: {message}")]
    Format { program: String, message: String },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, SdkgenError>;

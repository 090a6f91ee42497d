#![forbid(unsafe_code)]
#![deny(unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Schema normalization and Go client generation.
//!
//! A GraphQL SDL document or a Swagger 2 document is loaded, normalized into
//! a [`model::SchemaModel`] whose every field, parameter and response carries
//! a resolved [`model::TypeDescriptor`], and rendered into one Go source file.

pub mod config;
pub mod emit;
pub mod error;
pub mod graphql;
pub mod model;
pub mod naming;
pub mod openapi;
pub mod output;
pub mod resolve;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use config::GeneratorConfig;
pub use error::{Result, SdkgenError};
pub use model::{GenerationReport, SchemaModel};
pub use output::{CommandFormatter, NoopFormatter, SourceFormatter, select_formatter};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Generated {
    /// The written client file.
    pub path: PathBuf,
    pub report: GenerationReport,
}

/// Generate a Go GraphQL client from one or more SDL files.
pub fn generate_graphql_sdk(
    schemas: &[PathBuf],
    output_dir: &Path,
    config: &GeneratorConfig,
    formatter: &dyn SourceFormatter,
) -> Result<Generated> {
    let sources = graphql::load_graphql_sources(schemas)?;
    let doc = graphql::parse_graphql(&sources)?;
    let model = graphql::build_model(&doc, config)?;
    finish(model, output_dir, config, formatter)
}

/// Generate a Go REST client from a Swagger 2 YAML or JSON document.
pub fn generate_openapi_sdk(
    schema: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    formatter: &dyn SourceFormatter,
) -> Result<Generated> {
    let doc = openapi::SwaggerDocument::load(schema)?;
    let model = openapi::build_model(&doc, config)?;
    finish(model, output_dir, config, formatter)
}

fn finish(
    model: SchemaModel,
    output_dir: &Path,
    config: &GeneratorConfig,
    formatter: &dyn SourceFormatter,
) -> Result<Generated> {
    model.ensure_resolved(config.strict_refs)?;
    let report = model.report.clone();
    debug!(
        objects = model.objects.len(),
        enums = model.enums.len(),
        unions = model.unions.len(),
        "Rendering client."
    );

    let source = emit::render(model, config)?;
    let source = formatter.format(&config.file_name, source)?;
    let path = output::write_output(output_dir, &config.file_name, source.as_bytes())?;

    info!(path = %path.display(), "Generated client.");
    Ok(Generated { path, report })
}

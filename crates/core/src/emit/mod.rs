//! Renders a finished [`SchemaModel`] into Go client source.
//!
//! Templates are embedded at compile time. Each run builds its own `Tera`
//! instance and registers the helpers as closures over the model, so
//! nothing is shared between runs.

mod go;
mod helpers;

use std::sync::Arc;

use tera::{Context, Tera};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::{Operations, SchemaModel};

pub use go::{GO_ANY, exported_name, go_type, needs_pointer, uses_time};

const MACROS: (&str, &str) = (
    "go_macros.jinja2",
    include_str!("../../templates/go_macros.jinja2"),
);
const GRAPHQL_TEMPLATE: (&str, &str) = (
    "graphql_client.go.jinja2",
    include_str!("../../templates/graphql_client.go.jinja2"),
);
const OPENAPI_TEMPLATE: (&str, &str) = (
    "openapi_client.go.jinja2",
    include_str!("../../templates/openapi_client.go.jinja2"),
);

#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
    model: Arc<SchemaModel>,
}

impl Renderer {
    pub fn new(model: SchemaModel) -> Result<Self> {
        let model = Arc::new(model);
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(vec![MACROS, GRAPHQL_TEMPLATE, OPENAPI_TEMPLATE])?;
        helpers::register(&mut tera, &model);
        Ok(Self { tera, model })
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    /// Render the client source. Any template or helper failure is fatal.
    pub fn render(&self, config: &GeneratorConfig) -> Result<String> {
        let template = match self.model.operations {
            Operations::GraphQl(_) => GRAPHQL_TEMPLATE.0,
            Operations::OpenApi { .. } => OPENAPI_TEMPLATE.0,
        };

        let mut context = Context::new();
        context.insert("model", self.model.as_ref());
        context.insert("package", &config.package);
        context.insert("report", &self.model.report);
        context.insert("uses_time", &uses_time(&self.model));
        context.insert(
            "base_url",
            &self
                .model
                .info
                .as_ref()
                .map(|info| info.base_url.as_str())
                .unwrap_or_default(),
        );

        let source = self.tera.render(template, &context)?;
        debug!(template, bytes = source.len(), "Rendered client source.");
        Ok(source)
    }
}

/// Render `model` with the template matching its source format.
pub fn render(model: SchemaModel, config: &GeneratorConfig) -> Result<String> {
    Renderer::new(model)?.render(config)
}

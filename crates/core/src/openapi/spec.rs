//! Swagger 2.0 document structs for serde deserialization.
//!
//! Only the subset needed to build a client is modelled; unknown keys are
//! ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SdkgenError};
use crate::model::{HttpMethod, ParamLocation};

/// Root Swagger document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerDocument {
    pub swagger: Option<String>,
    #[serde(default)]
    pub info: Info,
    pub host: Option<String>,
    pub base_path: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub definitions: BTreeMap<String, Schema>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
}

impl SwaggerDocument {
    /// Load a document, choosing the codec from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str, &Path) -> Result<Self> = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml,
            Some("json") => Self::from_json,
            _ => {
                return Err(SdkgenError::UnsupportedExtension {
                    path: path.to_path_buf(),
                });
            }
        };
        let contents = fs::read_to_string(path).map_err(|source| SdkgenError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = parse(&contents, path)?;
        debug!(
            path = %path.display(),
            definitions = doc.definitions.len(),
            paths = doc.paths.len(),
            "Loaded OpenAPI document."
        );
        Ok(doc)
    }

    pub fn from_yaml(contents: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(contents).map_err(|source| SdkgenError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(contents: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(contents).map_err(|source| SdkgenError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    /// Path-level parameters shared by all operations.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, self.get.as_ref()),
            (HttpMethod::Put, self.put.as_ref()),
            (HttpMethod::Post, self.post.as_ref()),
            (HttpMethod::Delete, self.delete.as_ref()),
            (HttpMethod::Options, self.options.as_ref()),
            (HttpMethod::Head, self.head.as_ref()),
            (HttpMethod::Patch, self.patch.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

/// An API operation (endpoint).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// A parameter. Non-body parameters carry their type inline.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Payload schema of a `body` parameter.
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub inline: Schema,
}

impl Parameter {
    pub fn type_schema(&self) -> &Schema {
        self.schema.as_ref().unwrap_or(&self.inline)
    }
}

/// A response definition, or a `$ref` to one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub schema: Option<Schema>,
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
}

/// JSON Schema node as used by Swagger 2.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,

    /// Format hint (e.g., date-time, int64).
    pub format: Option<String>,

    /// Reference to another declaration.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    pub properties: Option<BTreeMap<String, Schema>>,

    /// Required property names for object types.
    #[serde(default)]
    pub required: Vec<String>,

    /// Map value schema (`true` for free-form values).
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    pub description: Option<String>,

    #[serde(rename = "x-nullable", default)]
    pub x_nullable: bool,

    /// Explicit Go identifier for a property.
    #[serde(rename = "x-go-name")]
    pub x_go_name: Option<String>,
}

impl Schema {
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self {
            ref_path: Some(pointer.into()),
            ..Self::default()
        }
    }

    pub fn is_array(&self) -> bool {
        self.schema_type.as_deref() == Some("array")
    }
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

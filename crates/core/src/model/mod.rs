//! The normalized, per-run schema model handed to the emitter.
//!
//! A [`SchemaModel`] is built once from a freshly parsed document and dropped
//! after rendering. Declarations are partitioned into disjoint registries and
//! every type occurrence is a fully resolved [`TypeDescriptor`].

mod descriptor;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{Result, SdkgenError};

pub use descriptor::{BuiltinScalar, TypeDescriptor, TypeKind, UNION_INSTANCE_SUFFIX};

#[derive(Debug, Clone, Serialize)]
pub struct SchemaModel {
    /// API metadata (OpenAPI only).
    pub info: Option<ApiInfo>,
    pub objects: BTreeMap<String, ObjectDecl>,
    pub inputs: BTreeMap<String, ObjectDecl>,
    pub enums: BTreeMap<String, EnumDecl>,
    pub unions: BTreeMap<String, UnionDecl>,
    pub scalars: BTreeMap<String, ScalarDecl>,
    pub operations: Operations,
    /// Schema pointer to declared name.
    pub ref_index: BTreeMap<String, String>,
    pub report: GenerationReport,
}

impl SchemaModel {
    pub fn root_operations(&self) -> Option<&RootOperations> {
        match &self.operations {
            Operations::GraphQl(roots) => Some(roots),
            Operations::OpenApi { .. } => None,
        }
    }

    pub fn tag_groups(&self) -> Option<&TagGroups> {
        match &self.operations {
            Operations::OpenApi { tags } => Some(tags),
            Operations::GraphQl(_) => None,
        }
    }

    /// Turns recorded reference fallbacks into an error when `strict` is set.
    pub fn ensure_resolved(&self, strict: bool) -> Result<()> {
        if strict && !self.report.unresolved_refs.is_empty() {
            return Err(SdkgenError::UnresolvedReferences {
                pointers: self.report.unresolved_pointers(),
            });
        }
        Ok(())
    }

    /// Every type descriptor held anywhere in the model.
    pub fn descriptors(&self) -> Vec<&TypeDescriptor> {
        let mut out = Vec::new();
        for decl in self.objects.values().chain(self.inputs.values()) {
            for field in &decl.fields {
                out.push(&field.ty);
                out.extend(field.arguments.iter().map(|arg| &arg.ty));
            }
        }
        out.extend(self.enums.values().map(|decl| &decl.underlying));
        out.extend(self.scalars.values().filter_map(|decl| decl.underlying.as_ref()));
        match &self.operations {
            Operations::GraphQl(roots) => {
                for op in roots.all() {
                    out.push(&op.ty);
                    out.extend(op.arguments.iter().map(|arg| &arg.ty));
                }
            }
            Operations::OpenApi { tags } => {
                for op in tags.values().flat_map(BTreeMap::values).flat_map(BTreeMap::values) {
                    out.extend(op.parameters.iter().map(|param| &param.ty));
                    out.extend(op.responses.values().filter_map(|resp| resp.ty.as_ref()));
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// `scheme://host/basePath`, empty when the document names no host.
    pub base_url: String,
}

/// An object type, interface or input object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectDecl {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDecl {
    pub name: String,
    /// Explicit target identifier (`x-go-name`).
    pub rename: Option<String>,
    pub description: Option<String>,
    pub ty: TypeDescriptor,
    pub required: bool,
    pub arguments: Vec<ArgDecl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgDecl {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeDescriptor,
    /// The annotation as written in the schema, e.g. `[ID!]!`.
    pub declared_type: String,
    pub default_value: Option<String>,
}

impl ArgDecl {
    pub fn is_required(&self) -> bool {
        !self.ty.nullable && self.default_value.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumDecl {
    pub name: String,
    pub description: Option<String>,
    /// Primitive carrying the values; always a builtin.
    pub underlying: TypeDescriptor,
    pub values: Vec<EnumValueDecl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumValueDecl {
    pub name: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnionDecl {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScalarDecl {
    pub name: String,
    pub description: Option<String>,
    /// Known structure of a named alias; `None` for opaque custom scalars.
    pub underlying: Option<TypeDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "format")]
pub enum Operations {
    #[serde(rename = "graphql")]
    GraphQl(RootOperations),
    #[serde(rename = "openapi")]
    OpenApi { tags: TagGroups },
}

/// tag -> path -> method -> operation.
pub type TagGroups = BTreeMap<String, BTreeMap<String, BTreeMap<HttpMethod, HttpOperation>>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RootOperations {
    pub queries: Vec<GraphqlOperation>,
    pub mutations: Vec<GraphqlOperation>,
    pub subscriptions: Vec<GraphqlOperation>,
}

impl RootOperations {
    pub fn all(&self) -> impl Iterator<Item = &GraphqlOperation> {
        self.queries
            .iter()
            .chain(&self.mutations)
            .chain(&self.subscriptions)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphqlOperation {
    pub name: String,
    /// Client method name, unique across the three roots.
    pub function_name: String,
    pub description: Option<String>,
    pub arguments: Vec<ArgDecl>,
    pub ty: TypeDescriptor,
    /// Selection set for the returned type, e.g. `{ id title }`; empty for leaves.
    pub selection: String,
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized OpenAPI operation.
#[derive(Debug, Clone, Serialize)]
pub struct HttpOperation {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
    /// Exported identifier for the generated wrapper.
    pub function_name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<ParamDecl>,
    /// Keyed by status code (`"200"`, `"default"`, ...).
    pub responses: BTreeMap<String, ResponseDecl>,
    /// Payload of the first successful response that carries a schema.
    pub success: Option<TypeDescriptor>,
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamDecl {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub description: Option<String>,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseDecl {
    pub status: String,
    pub description: Option<String>,
    pub ty: Option<TypeDescriptor>,
}

/// Observable record of every lenient fallback taken during a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub unresolved_refs: Vec<UnresolvedRef>,
    /// References to declarations that are not emitted as types, such as
    /// operation roots or responses without a schema.
    pub unclassified_refs: Vec<UnresolvedRef>,
    pub dropped_operations: Vec<DroppedOperation>,
    /// Responses hidden by a definition of the same name.
    pub shadowed_responses: Vec<String>,
}

impl GenerationReport {
    /// Distinct unresolved pointers, sorted.
    pub fn unresolved_pointers(&self) -> Vec<String> {
        let mut pointers: Vec<String> = self
            .unresolved_refs
            .iter()
            .map(|r| r.pointer.clone())
            .collect();
        pointers.sort();
        pointers.dedup();
        pointers
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved_refs.is_empty()
            && self.unclassified_refs.is_empty()
            && self.dropped_operations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedRef {
    pub pointer: String,
    /// Where the reference occurred, e.g. `Pet.owner`.
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedOperation {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn empty_model() -> SchemaModel {
        SchemaModel {
            info: None,
            objects: BTreeMap::new(),
            inputs: BTreeMap::new(),
            enums: BTreeMap::new(),
            unions: BTreeMap::new(),
            scalars: BTreeMap::new(),
            operations: Operations::GraphQl(RootOperations::default()),
            ref_index: BTreeMap::new(),
            report: GenerationReport::default(),
        }
    }

    #[test]
    fn test_ensure_resolved_is_lenient_by_default() {
        let mut model = empty_model();
        model.report.unresolved_refs.push(UnresolvedRef {
            pointer: "#/definitions/Missing".into(),
            site: "Pet.owner".into(),
        });
        assert!(model.ensure_resolved(false).is_ok());

        let err = model.ensure_resolved(true).unwrap_err();
        match err {
            SdkgenError::UnresolvedReferences { pointers } => {
                assert_eq!(pointers, vec!["#/definitions/Missing".to_string()]);
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_pointers_are_deduplicated() {
        let mut report = GenerationReport::default();
        for site in ["A.x", "B.y"] {
            report.unresolved_refs.push(UnresolvedRef {
                pointer: "#/definitions/Gone".into(),
                site: site.into(),
            });
        }
        assert_eq!(report.unresolved_pointers().len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_operations_serialize_with_format_tag() {
        let model = empty_model();
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["operations"]["format"], "graphql");
        assert!(value["operations"]["queries"].is_array());
    }
}

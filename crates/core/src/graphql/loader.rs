//! Reading SDL files and assembling one type set from several sources.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use graphql_parser::schema::{Definition, TypeDefinition, TypeExtension, parse_schema};
use tracing::debug;

use crate::error::{Result, SdkgenError};

pub type TypeDef = TypeDefinition<'static, String>;

/// One SDL document and where it came from.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub path: PathBuf,
    pub text: String,
}

impl SchemaSource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Names of the three operation root types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootNames {
    pub query: String,
    pub mutation: String,
    pub subscription: String,
}

impl Default for RootNames {
    fn default() -> Self {
        Self {
            query: "Query".to_string(),
            mutation: "Mutation".to_string(),
            subscription: "Subscription".to_string(),
        }
    }
}

impl RootNames {
    pub fn contains(&self, name: &str) -> bool {
        name == self.query || name == self.mutation || name == self.subscription
    }
}

/// Every type declared across the sources, extensions merged in.
#[derive(Debug, Default)]
pub struct GraphqlDocument {
    pub types: BTreeMap<String, TypeDef>,
    pub roots: RootNames,
}

pub fn load_graphql_sources(paths: &[PathBuf]) -> Result<Vec<SchemaSource>> {
    paths.iter().map(|path| read_source(path)).collect()
}

fn read_source(path: &Path) -> Result<SchemaSource> {
    let text = fs::read_to_string(path).map_err(|source| SdkgenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "Read GraphQL source.");
    Ok(SchemaSource::new(path, text))
}

/// Parse every source and merge them into one document.
///
/// Type definitions are collected before extensions are applied, so an
/// `extend` may precede its base definition or live in another file.
pub fn parse_graphql(sources: &[SchemaSource]) -> Result<GraphqlDocument> {
    let mut doc = GraphqlDocument::default();
    let mut extensions = Vec::new();

    for source in sources {
        let parsed = parse_schema::<String>(&source.text)
            .map_err(|err| SdkgenError::GraphqlParse {
                path: source.path.clone(),
                message: err.to_string(),
            })?
            .into_static();

        for definition in parsed.definitions {
            match definition {
                Definition::SchemaDefinition(schema) => {
                    if let Some(query) = schema.query {
                        doc.roots.query = query;
                    }
                    if let Some(mutation) = schema.mutation {
                        doc.roots.mutation = mutation;
                    }
                    if let Some(subscription) = schema.subscription {
                        doc.roots.subscription = subscription;
                    }
                }
                Definition::TypeDefinition(def) => {
                    let name = type_name(&def).to_string();
                    if doc.types.contains_key(&name) {
                        return Err(SdkgenError::DuplicateType { name });
                    }
                    doc.types.insert(name, def);
                }
                Definition::TypeExtension(ext) => extensions.push(ext),
                Definition::DirectiveDefinition(_) => {}
            }
        }
    }

    for ext in extensions {
        apply_extension(&mut doc.types, ext)?;
    }

    debug!(
        types = doc.types.len(),
        sources = sources.len(),
        "Assembled GraphQL document."
    );
    Ok(doc)
}

pub fn type_name(def: &TypeDef) -> &str {
    match def {
        TypeDefinition::Scalar(t) => &t.name,
        TypeDefinition::Object(t) => &t.name,
        TypeDefinition::Interface(t) => &t.name,
        TypeDefinition::Union(t) => &t.name,
        TypeDefinition::Enum(t) => &t.name,
        TypeDefinition::InputObject(t) => &t.name,
    }
}

fn apply_extension(
    types: &mut BTreeMap<String, TypeDef>,
    ext: TypeExtension<'static, String>,
) -> Result<()> {
    let name = match &ext {
        TypeExtension::Scalar(e) => e.name.clone(),
        TypeExtension::Object(e) => e.name.clone(),
        TypeExtension::Interface(e) => e.name.clone(),
        TypeExtension::Union(e) => e.name.clone(),
        TypeExtension::Enum(e) => e.name.clone(),
        TypeExtension::InputObject(e) => e.name.clone(),
    };
    let target = types
        .get_mut(&name)
        .ok_or_else(|| SdkgenError::UnknownExtension { name: name.clone() })?;

    match (target, ext) {
        (TypeDefinition::Scalar(_), TypeExtension::Scalar(_)) => {}
        (TypeDefinition::Object(t), TypeExtension::Object(e)) => {
            t.implements_interfaces.extend(e.implements_interfaces);
            t.fields.extend(e.fields);
        }
        (TypeDefinition::Interface(t), TypeExtension::Interface(e)) => {
            t.fields.extend(e.fields);
        }
        (TypeDefinition::Union(t), TypeExtension::Union(e)) => t.types.extend(e.types),
        (TypeDefinition::Enum(t), TypeExtension::Enum(e)) => t.values.extend(e.values),
        (TypeDefinition::InputObject(t), TypeExtension::InputObject(e)) => {
            t.fields.extend(e.fields);
        }
        _ => return Err(SdkgenError::UnknownExtension { name }),
    }
    Ok(())
}

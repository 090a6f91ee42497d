//! Normalization from a Swagger document to the schema model.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use super::operations::group_operations;
use super::spec::{Schema, SwaggerDocument};
use super::{DEFINITIONS_PREFIX, RESPONSES_PREFIX};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::model::{
    ApiInfo, BuiltinScalar, EnumDecl, EnumValueDecl, FieldDecl, GenerationReport, ObjectDecl,
    Operations, ScalarDecl, SchemaModel, TypeDescriptor,
};
use crate::resolve::{Category, Classification, Context, FieldAnnotation, RefIndex, Resolver, ScalarTable};

/// Normalize a Swagger document into a [`SchemaModel`].
///
/// Definitions and named responses share one namespace. A response whose
/// name collides with a definition keeps the definition.
pub fn build_model(doc: &SwaggerDocument, _config: &GeneratorConfig) -> Result<SchemaModel> {
    let scalars = ScalarTable::openapi();

    let mut index = RefIndex::default().with_section(DEFINITIONS_PREFIX, &doc.definitions);
    let mut shadowed = Vec::new();
    for (name, response) in &doc.responses {
        index.insert(
            format!("{RESPONSES_PREFIX}{name}"),
            name,
            response.schema.as_ref(),
        );
        if doc.definitions.contains_key(name) {
            warn!(name = %name, "Response shares its name with a definition, keeping the definition.");
            shadowed.push(name.clone());
        }
    }

    let declarations: Vec<(&String, &Schema)> = doc
        .definitions
        .iter()
        .chain(
            doc.responses
                .iter()
                .filter(|(name, _)| !doc.definitions.contains_key(*name))
                .filter_map(|(name, response)| response.schema.as_ref().map(|s| (name, s))),
        )
        .collect();
    let classes = Classification::build(declarations.iter().copied(), |_| false);
    let mut resolver = Resolver::new(index.names(), &classes, &scalars);

    let mut model = SchemaModel {
        info: Some(api_info(doc)),
        objects: BTreeMap::new(),
        inputs: BTreeMap::new(),
        enums: BTreeMap::new(),
        unions: BTreeMap::new(),
        scalars: BTreeMap::new(),
        operations: Operations::OpenApi {
            tags: BTreeMap::new(),
        },
        ref_index: index.names().clone(),
        report: GenerationReport {
            shadowed_responses: shadowed,
            ..GenerationReport::default()
        },
    };

    for (name, schema) in declarations {
        match classes.category(name) {
            Some(Category::Object) => {
                model
                    .objects
                    .insert(name.clone(), object_decl(&mut resolver, name, schema));
            }
            Some(Category::Enum) => {
                model
                    .enums
                    .insert(name.clone(), enum_decl(&scalars, name, schema));
            }
            Some(Category::Scalar) => {
                let underlying = resolver.resolve(name, schema, true, Context::Root);
                model.scalars.insert(
                    name.clone(),
                    ScalarDecl {
                        name: name.clone(),
                        description: schema.description.clone(),
                        underlying: Some(underlying),
                    },
                );
            }
            Some(Category::Input | Category::Union) | None => {}
        }
    }

    let (tags, dropped) = group_operations(doc, &mut resolver, &index);
    model.operations = Operations::OpenApi { tags };
    model.report.dropped_operations = dropped;
    resolver.finish(&mut model.report);

    debug!(
        objects = model.objects.len(),
        enums = model.enums.len(),
        scalars = model.scalars.len(),
        unresolved = model.report.unresolved_refs.len(),
        "Normalized OpenAPI document."
    );
    Ok(model)
}

fn api_info(doc: &SwaggerDocument) -> ApiInfo {
    let base_path = doc.base_path.as_deref().unwrap_or_default();
    let base_url = match doc.host.as_deref() {
        Some(host) => {
            let scheme = doc.schemes.first().map_or("https", String::as_str);
            format!("{scheme}://{host}{base_path}")
        }
        None => base_path.to_string(),
    };
    ApiInfo {
        title: doc.info.title.clone(),
        version: doc.info.version.clone(),
        description: doc.info.description.clone(),
        base_url,
    }
}

/// Properties sorted by name; `required` decides nullability.
fn object_decl(resolver: &mut Resolver<'_>, name: &str, schema: &Schema) -> ObjectDecl {
    let required: HashSet<&str> = schema.required.iter().map(String::as_str).collect();
    let fields = schema
        .properties
        .iter()
        .flatten()
        .map(|(prop, prop_schema)| {
            let is_required = required.contains(prop.as_str());
            FieldDecl {
                name: prop.clone(),
                rename: prop_schema.x_go_name.clone(),
                description: prop_schema.description.clone(),
                ty: resolver.resolve(
                    &format!("{name}.{prop}"),
                    prop_schema,
                    is_required,
                    Context::ObjectField,
                ),
                required: is_required,
                arguments: Vec::new(),
            }
        })
        .collect();
    ObjectDecl {
        name: name.to_string(),
        description: schema.description.clone(),
        fields,
        interfaces: Vec::new(),
    }
}

fn enum_decl(scalars: &ScalarTable, name: &str, schema: &Schema) -> EnumDecl {
    let scalar = schema.builtin(scalars).unwrap_or(BuiltinScalar::String);
    let values = schema
        .enum_values
        .iter()
        .flatten()
        .filter(|value| !value.is_null())
        .map(|value| EnumValueDecl {
            name: match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            value: value.clone(),
            description: None,
        })
        .collect();
    EnumDecl {
        name: name.to_string(),
        description: schema.description.clone(),
        underlying: TypeDescriptor::builtin(scalar, false),
        values,
    }
}

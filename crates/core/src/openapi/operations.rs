//! Operation normalization and tag grouping.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::spec::{Operation, Parameter, Schema, SwaggerDocument};
use crate::model::{
    DroppedOperation, HttpMethod, HttpOperation, ParamDecl, ResponseDecl, TagGroups,
    TypeDescriptor,
};
use crate::naming::to_pascal_case;
use crate::resolve::{Context, RefIndex, Resolver};

/// Status codes checked, in order, for the success payload.
const SUCCESS_STATUSES: [&str; 4] = ["200", "201", "202", "default"];

/// Insert every path x method operation under each of its tags.
///
/// Multi-tag operations are duplicated under every tag; untagged
/// operations are dropped and reported.
pub(super) fn group_operations(
    doc: &SwaggerDocument,
    resolver: &mut Resolver<'_>,
    index: &RefIndex<'_, Schema>,
) -> (TagGroups, Vec<DroppedOperation>) {
    let mut groups = TagGroups::new();
    let mut dropped = Vec::new();

    for (path, item) in &doc.paths {
        for (method, op) in item.operations() {
            let operation_id = operation_id(path, method, op);
            if op.tags.is_empty() {
                warn!(
                    path = %path,
                    method = %method,
                    operation_id = %operation_id,
                    "Operation has no tags, excluding it from the client."
                );
                dropped.push(DroppedOperation {
                    path: path.clone(),
                    method,
                    operation_id,
                });
                continue;
            }

            let normalized =
                normalize_operation(path, method, op, operation_id, &item.parameters, resolver, index);
            for tag in &op.tags {
                groups
                    .entry(tag.clone())
                    .or_default()
                    .entry(path.clone())
                    .or_default()
                    .insert(method, normalized.clone());
            }
        }
    }

    debug!(
        tags = groups.len(),
        dropped = dropped.len(),
        "Grouped OpenAPI operations by tag."
    );
    (groups, dropped)
}

fn normalize_operation(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    operation_id: String,
    shared_params: &[Parameter],
    resolver: &mut Resolver<'_>,
    index: &RefIndex<'_, Schema>,
) -> HttpOperation {
    let site = format!("{method} {path}");

    let parameters = merge_parameters(shared_params, &op.parameters)
        .into_iter()
        .map(|param| ParamDecl {
            name: param.name.clone(),
            location: param.location,
            required: param.required,
            description: param.description.clone(),
            ty: resolver.resolve(
                &format!("{site} {}", param.name),
                param.type_schema(),
                param.required,
                Context::Root,
            ),
        })
        .collect();

    let responses: BTreeMap<String, ResponseDecl> = op
        .responses
        .iter()
        .map(|(status, response)| {
            let response_site = format!("{site} {status}");
            let (ty, description) = match (&response.schema, &response.ref_path) {
                (Some(schema), _) => (
                    Some(resolver.resolve(&response_site, schema, true, Context::Root)),
                    response.description.clone(),
                ),
                (None, Some(pointer)) => {
                    // A known response without a schema carries no payload.
                    let bodyless = index.resolve(pointer).is_some() && index.body(pointer).is_none();
                    let ty = (!bodyless).then(|| {
                        resolver.resolve(
                            &response_site,
                            &Schema::reference(pointer.clone()),
                            true,
                            Context::Root,
                        )
                    });
                    let description = response.description.clone().or_else(|| {
                        index
                            .body(pointer)
                            .and_then(|schema| schema.description.clone())
                    });
                    (ty, description)
                }
                (None, None) => (None, response.description.clone()),
            };
            (
                status.clone(),
                ResponseDecl {
                    status: status.clone(),
                    description,
                    ty,
                },
            )
        })
        .collect();

    let success = success_type(&responses);

    HttpOperation {
        path: path.to_string(),
        method,
        function_name: to_pascal_case(&operation_id),
        operation_id,
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters,
        responses,
        success,
    }
}

/// The declared `operationId`, or `<method>_<path segments>`.
fn operation_id(path: &str, method: HttpMethod, op: &Operation) -> String {
    if let Some(id) = op.operation_id.as_deref().filter(|id| !id.trim().is_empty()) {
        return id.to_string();
    }
    let segments: Vec<_> = path
        .split('/')
        .map(|segment| segment.trim_start_matches('{').trim_end_matches('}'))
        .filter(|segment| !segment.is_empty())
        .collect();
    format!(
        "{}_{}",
        method.as_str().to_ascii_lowercase(),
        segments.join("_")
    )
}

/// Operation-level parameters override path-level ones with the same
/// name and location.
fn merge_parameters<'p>(shared: &'p [Parameter], own: &'p [Parameter]) -> Vec<&'p Parameter> {
    let mut merged: Vec<&Parameter> = shared
        .iter()
        .filter(|p| {
            !own
                .iter()
                .any(|o| o.name == p.name && o.location == p.location)
        })
        .collect();
    merged.extend(own);
    merged
}

fn success_type(responses: &BTreeMap<String, ResponseDecl>) -> Option<TypeDescriptor> {
    SUCCESS_STATUSES
        .iter()
        .find_map(|status| responses.get(*status).and_then(|r| r.ty.clone()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::ParamLocation;

    fn param(name: &str, location: ParamLocation, required: bool) -> Parameter {
        Parameter {
            name: name.into(),
            location,
            description: None,
            required,
            schema: None,
            inline: Schema::default(),
        }
    }

    #[test]
    fn test_operation_id_fallback() {
        let op = Operation::default();
        assert_eq!(
            operation_id("/pets/{petId}/photos", HttpMethod::Get, &op),
            "get_pets_petId_photos"
        );

        let named = Operation {
            operation_id: Some("findPets".into()),
            ..Operation::default()
        };
        assert_eq!(operation_id("/pets", HttpMethod::Get, &named), "findPets");
    }

    #[test]
    fn test_operation_parameters_override_path_parameters() {
        let shared = vec![
            param("petId", ParamLocation::Path, false),
            param("trace", ParamLocation::Header, false),
        ];
        let own = vec![
            param("petId", ParamLocation::Path, true),
            param("petId", ParamLocation::Query, false),
        ];
        let merged = merge_parameters(&shared, &own);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].name, "trace");
        assert!(merged[1].required);
        assert_eq!(merged[2].location, ParamLocation::Query);
    }

    #[test]
    fn test_success_type_prefers_200() {
        let string = TypeDescriptor::builtin(crate::model::BuiltinScalar::String, false);
        let responses = BTreeMap::from([
            (
                "201".to_string(),
                ResponseDecl {
                    status: "201".into(),
                    description: None,
                    ty: Some(TypeDescriptor::unknown()),
                },
            ),
            (
                "200".to_string(),
                ResponseDecl {
                    status: "200".into(),
                    description: None,
                    ty: Some(string.clone()),
                },
            ),
            (
                "204".to_string(),
                ResponseDecl {
                    status: "204".into(),
                    description: None,
                    ty: None,
                },
            ),
        ]);
        assert_eq!(success_type(&responses), Some(string));

        let empty = BTreeMap::from([(
            "204".to_string(),
            ResponseDecl {
                status: "204".into(),
                description: None,
                ty: None,
            },
        )]);
        assert_eq!(success_type(&empty), None);
    }
}

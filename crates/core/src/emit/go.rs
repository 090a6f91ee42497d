//! Go rendering of resolved type descriptors.

use std::collections::HashSet;

use crate::model::{BuiltinScalar, SchemaModel, TypeDescriptor, TypeKind};
use crate::naming::{escape_go_string, to_pascal_case};

/// Go spelling of a value that carries no static type.
pub const GO_ANY: &str = "interface{}";

/// Exported Go identifier for a declared name.
pub fn exported_name(name: &str) -> String {
    let pascal = to_pascal_case(name);
    match pascal.chars().next() {
        None => "Empty".to_string(),
        Some(first) if first.is_ascii_digit() => format!("T{pascal}"),
        Some(_) => pascal,
    }
}

fn builtin(scalar: BuiltinScalar) -> &'static str {
    match scalar {
        BuiltinScalar::String | BuiltinScalar::Id | BuiltinScalar::Date => "string",
        BuiltinScalar::Integer => "int",
        BuiltinScalar::Float => "float64",
        BuiltinScalar::Boolean => "bool",
        BuiltinScalar::DateTime => "time.Time",
    }
}

/// Whether an occurrence renders as `*T`.
///
/// Nullable object and union references take a pointer, as does any
/// reference back to the enclosing declaration `parent`, directly or through
/// a chain of required object fields. Lists, maps, builtins and enums never do.
pub fn needs_pointer(model: &SchemaModel, ty: &TypeDescriptor, parent: Option<&str>) -> bool {
    match &ty.kind {
        TypeKind::ObjectRef { name } => {
            ty.nullable
                || parent.is_some_and(|parent| {
                    parent == name || embeds_by_value(model, name, parent)
                })
        }
        TypeKind::UnionRef { name, .. } => {
            ty.nullable || parent.is_some_and(|parent| parent == name)
        }
        _ => false,
    }
}

/// Whether the struct for `from` contains `target` by value, following
/// required object fields. Such a chain is an invalid recursive type in Go.
fn embeds_by_value(model: &SchemaModel, from: &str, target: &str) -> bool {
    let mut stack = vec![from];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        let Some(decl) = model.objects.get(current).or_else(|| model.inputs.get(current)) else {
            continue;
        };
        for field in &decl.fields {
            if let TypeKind::ObjectRef { name } = &field.ty.kind {
                if field.ty.nullable {
                    continue;
                }
                if name == target {
                    return true;
                }
                stack.push(name);
            }
        }
    }
    false
}

/// Go type expression for `ty` appearing inside `parent`.
pub fn go_type(model: &SchemaModel, ty: &TypeDescriptor, parent: Option<&str>) -> String {
    match &ty.kind {
        TypeKind::List { element } => format!("[]{}", go_type(model, element, parent)),
        TypeKind::Map { element } => format!("map[string]{}", go_type(model, element, parent)),
        TypeKind::BuiltIn { scalar } => builtin(*scalar).to_string(),
        TypeKind::ObjectRef { .. } | TypeKind::UnionRef { .. } => {
            let name = exported_name(&ty.reference_name().unwrap_or_default());
            if needs_pointer(model, ty, parent) {
                format!("*{name}")
            } else {
                name
            }
        }
        TypeKind::EnumRef { name } => exported_name(name),
        TypeKind::Scalar { name } => {
            let aliased = model
                .scalars
                .get(name)
                .is_some_and(|decl| decl.underlying.is_some());
            if aliased {
                exported_name(name)
            } else {
                GO_ANY.to_string()
            }
        }
        TypeKind::Unknown => GO_ANY.to_string(),
    }
}

/// Whether any rendered type needs the `time` import.
pub fn uses_time(model: &SchemaModel) -> bool {
    let mut found = false;
    for ty in model.descriptors() {
        ty.walk(&mut |node| {
            if matches!(
                node.kind,
                TypeKind::BuiltIn {
                    scalar: BuiltinScalar::DateTime
                }
            ) {
                found = true;
            }
        });
    }
    found
}

/// Go literal for an enum value.
pub fn go_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => format!("\"{}\"", escape_go_string(s)),
        serde_json::Value::Null => "nil".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{
        FieldDecl, GenerationReport, ObjectDecl, Operations, RootOperations, ScalarDecl,
    };

    fn model() -> SchemaModel {
        let scalars = BTreeMap::from([
            (
                "Json".to_string(),
                ScalarDecl {
                    name: "Json".into(),
                    description: None,
                    underlying: None,
                },
            ),
            (
                "Tags".to_string(),
                ScalarDecl {
                    name: "Tags".into(),
                    description: None,
                    underlying: Some(TypeDescriptor::list(
                        TypeDescriptor::builtin(BuiltinScalar::String, false),
                        false,
                    )),
                },
            ),
        ]);
        SchemaModel {
            info: None,
            objects: BTreeMap::new(),
            inputs: BTreeMap::new(),
            enums: BTreeMap::new(),
            unions: BTreeMap::new(),
            scalars,
            operations: Operations::GraphQl(RootOperations::default()),
            ref_index: BTreeMap::new(),
            report: GenerationReport::default(),
        }
    }

    fn object(name: &str, nullable: bool) -> TypeDescriptor {
        TypeDescriptor::new(TypeKind::ObjectRef { name: name.into() }, nullable)
    }

    #[test]
    fn test_pointer_prefix_decision() {
        let model = model();
        assert_eq!(go_type(&model, &object("Post", true), None), "*Post");
        assert_eq!(go_type(&model, &object("Post", false), None), "Post");
        assert_eq!(go_type(&model, &object("Node", false), Some("Node")), "*Node");
        assert_eq!(
            go_type(
                &model,
                &TypeDescriptor::list(object("Post", false), true),
                None
            ),
            "[]Post"
        );
        assert_eq!(
            go_type(
                &model,
                &TypeDescriptor::builtin(BuiltinScalar::Integer, true),
                None
            ),
            "int"
        );
    }

    #[test]
    fn test_union_instance_and_maps() {
        let model = model();
        let instance = TypeDescriptor::new(
            TypeKind::UnionRef {
                name: "SearchResult".into(),
                instance: true,
            },
            false,
        );
        assert_eq!(
            go_type(&model, &TypeDescriptor::list(instance, false), None),
            "[]SearchResultInstance"
        );

        let nested = TypeDescriptor::map(
            TypeDescriptor::map(
                TypeDescriptor::map(TypeDescriptor::builtin(BuiltinScalar::Float, false), false),
                false,
            ),
            true,
        );
        assert_eq!(
            go_type(&model, &nested, None),
            "map[string]map[string]map[string]float64"
        );
    }

    #[test]
    fn test_scalars_and_unknown() {
        let model = model();
        let json = TypeDescriptor::new(TypeKind::Scalar { name: "Json".into() }, true);
        let tags = TypeDescriptor::new(TypeKind::Scalar { name: "Tags".into() }, true);
        assert_eq!(go_type(&model, &json, None), GO_ANY);
        assert_eq!(go_type(&model, &tags, None), "Tags");
        assert_eq!(go_type(&model, &TypeDescriptor::unknown(), None), GO_ANY);
        assert_eq!(
            go_type(
                &model,
                &TypeDescriptor::builtin(BuiltinScalar::DateTime, false),
                None
            ),
            "time.Time"
        );
    }

    #[test]
    fn test_exported_name_and_literals() {
        assert_eq!(exported_name("pet_store"), "PetStore");
        assert_eq!(exported_name("2fa"), "T2fa");
        assert_eq!(go_literal(&serde_json::json!("a\"b")), "\"a\\\"b\"");
        assert_eq!(go_literal(&serde_json::json!(3)), "3");
    }

    fn required_field(name: &str, ty: TypeDescriptor) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            rename: None,
            description: None,
            required: true,
            ty,
            arguments: Vec::new(),
        }
    }

    fn declare(model: &mut SchemaModel, name: &str, fields: Vec<FieldDecl>) {
        model.objects.insert(
            name.to_string(),
            ObjectDecl {
                name: name.into(),
                description: None,
                fields,
                interfaces: Vec::new(),
            },
        );
    }

    #[test]
    fn test_required_reference_cycle_takes_a_pointer() {
        let mut model = model();
        declare(&mut model, "A", vec![required_field("b", object("B", false))]);
        declare(&mut model, "B", vec![required_field("c", object("C", false))]);
        declare(&mut model, "C", vec![required_field("a", object("A", false))]);
        declare(&mut model, "Leaf", vec![required_field("a", object("A", false))]);

        assert_eq!(go_type(&model, &object("B", false), Some("A")), "*B");
        assert_eq!(go_type(&model, &object("A", false), Some("C")), "*A");
        assert_eq!(go_type(&model, &object("A", false), Some("Leaf")), "A");
        assert_eq!(go_type(&model, &object("A", false), None), "A");
    }

    #[test]
    fn test_nullable_link_breaks_the_cycle() {
        let mut model = model();
        declare(&mut model, "A", vec![required_field("b", object("B", false))]);
        declare(&mut model, "B", vec![required_field("a", object("A", true))]);

        assert_eq!(go_type(&model, &object("B", false), Some("A")), "B");
        assert_eq!(go_type(&model, &object("A", true), Some("B")), "*A");
    }
}

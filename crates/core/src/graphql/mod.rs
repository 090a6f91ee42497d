//! GraphQL SDL -> [`SchemaModel`].
//!
//! The pipeline is:
//! 1. Load: SDL files -> [`SchemaSource`]s
//! 2. Parse: sources -> [`GraphqlDocument`] (extensions merged, roots named)
//! 3. Normalize: index `#/types/<Name>`, classify, resolve every field
//! 4. Group: root type fields -> queries, mutations, subscriptions

mod loader;
mod selection;

use std::collections::{BTreeMap, HashSet};

use graphql_parser::schema::{Field, InputValue, Type, TypeDefinition, Value};
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::emit::exported_name;
use crate::error::Result;
use crate::model::{
    ArgDecl, BuiltinScalar, EnumDecl, EnumValueDecl, FieldDecl, GenerationReport,
    GraphqlOperation, ObjectDecl, Operations, RootOperations, ScalarDecl, SchemaModel,
    TypeDescriptor, UnionDecl,
};
use crate::resolve::{
    Category, Classification, Context, DeclarationBody, FieldAnnotation, RefIndex, Resolver,
    ScalarTable,
};

pub use loader::{
    GraphqlDocument, RootNames, SchemaSource, TypeDef, load_graphql_sources, parse_graphql,
};
pub use selection::SelectionBuilder;

pub const TYPE_POINTER_PREFIX: &str = "#/types/";

type GqlType = Type<'static, String>;

impl FieldAnnotation for GqlType {
    fn list_element(&self) -> Option<Option<&Self>> {
        match strip_non_null(self) {
            Type::ListType(inner) => Some(Some(inner)),
            _ => None,
        }
    }

    fn element_required(&self, element: &Self) -> bool {
        is_non_null(element)
    }

    fn builtin(&self, scalars: &ScalarTable) -> Option<BuiltinScalar> {
        match strip_non_null(self) {
            Type::NamedType(name) => scalars.get(name),
            _ => None,
        }
    }

    fn pointer(&self) -> Option<String> {
        match strip_non_null(self) {
            Type::NamedType(name) => Some(format!("{TYPE_POINTER_PREFIX}{name}")),
            _ => None,
        }
    }
}

impl DeclarationBody for TypeDef {
    fn category(&self) -> Category {
        match self {
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) => Category::Object,
            TypeDefinition::InputObject(_) => Category::Input,
            TypeDefinition::Enum(_) => Category::Enum,
            TypeDefinition::Union(_) => Category::Union,
            TypeDefinition::Scalar(_) => Category::Scalar,
        }
    }
}

fn strip_non_null(ty: &GqlType) -> &GqlType {
    match ty {
        Type::NonNullType(inner) => inner,
        other => other,
    }
}

fn is_non_null(ty: &GqlType) -> bool {
    matches!(ty, Type::NonNullType(_))
}

/// The annotation in SDL notation, e.g. `[ID!]!`.
fn render_type(ty: &GqlType) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::ListType(inner) => format!("[{}]", render_type(inner)),
        Type::NonNullType(inner) => format!("{}!", render_type(inner)),
    }
}

fn render_value(value: &Value<'static, String>) -> String {
    match value {
        Value::Variable(name) => format!("${name}"),
        Value::Int(n) => n.as_i64().map_or_else(String::new, |n| n.to_string()),
        Value::Float(f) => f.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Boolean(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Enum(name) => name.clone(),
        Value::List(items) => {
            let items: Vec<_> = items.iter().map(render_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(fields) => {
            let fields: Vec<_> = fields
                .iter()
                .map(|(k, v)| format!("{k}: {}", render_value(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

/// Normalize a parsed document into a [`SchemaModel`].
pub fn build_model(doc: &GraphqlDocument, config: &GeneratorConfig) -> Result<SchemaModel> {
    let scalars = ScalarTable::graphql(&config.scalars);
    let index = RefIndex::default().with_section(TYPE_POINTER_PREFIX, &doc.types);
    let classes = Classification::build(&doc.types, |name| {
        scalars.contains(name) || doc.roots.contains(name)
    });
    let mut resolver = Resolver::new(index.names(), &classes, &scalars);

    let mut model = SchemaModel {
        info: None,
        objects: BTreeMap::new(),
        inputs: BTreeMap::new(),
        enums: BTreeMap::new(),
        unions: BTreeMap::new(),
        scalars: BTreeMap::new(),
        operations: Operations::GraphQl(RootOperations::default()),
        ref_index: index.names().clone(),
        report: GenerationReport::default(),
    };

    for (name, def) in &doc.types {
        if classes.category(name).is_none() {
            continue;
        }
        match def {
            TypeDefinition::Object(t) => {
                let decl = object_decl(
                    &mut resolver,
                    name,
                    t.description.clone(),
                    &t.fields,
                    t.implements_interfaces.clone(),
                );
                model.objects.insert(name.clone(), decl);
            }
            TypeDefinition::Interface(t) => {
                let decl =
                    object_decl(&mut resolver, name, t.description.clone(), &t.fields, Vec::new());
                model.objects.insert(name.clone(), decl);
            }
            TypeDefinition::InputObject(t) => {
                let fields = t
                    .fields
                    .iter()
                    .map(|input| {
                        let arg = arg_decl(&mut resolver, name, input, Context::ObjectField);
                        FieldDecl {
                            required: !arg.ty.nullable,
                            name: arg.name,
                            rename: None,
                            description: arg.description,
                            ty: arg.ty,
                            arguments: Vec::new(),
                        }
                    })
                    .collect();
                model.inputs.insert(
                    name.clone(),
                    ObjectDecl {
                        name: name.clone(),
                        description: t.description.clone(),
                        fields,
                        interfaces: Vec::new(),
                    },
                );
            }
            TypeDefinition::Enum(t) => {
                let values = t
                    .values
                    .iter()
                    .map(|v| EnumValueDecl {
                        name: v.name.clone(),
                        value: serde_json::Value::String(v.name.clone()),
                        description: v.description.clone(),
                    })
                    .collect();
                model.enums.insert(
                    name.clone(),
                    EnumDecl {
                        name: name.clone(),
                        description: t.description.clone(),
                        underlying: TypeDescriptor::builtin(BuiltinScalar::String, false),
                        values,
                    },
                );
            }
            TypeDefinition::Union(t) => {
                model.unions.insert(
                    name.clone(),
                    UnionDecl {
                        name: name.clone(),
                        description: t.description.clone(),
                        members: t.types.clone(),
                    },
                );
            }
            TypeDefinition::Scalar(t) => {
                model.scalars.insert(
                    name.clone(),
                    ScalarDecl {
                        name: name.clone(),
                        description: t.description.clone(),
                        underlying: None,
                    },
                );
            }
        }
    }

    let roots = group_operations(doc, &mut resolver, &model, config.selection_depth);
    debug!(
        queries = roots.queries.len(),
        mutations = roots.mutations.len(),
        subscriptions = roots.subscriptions.len(),
        "Grouped GraphQL operations."
    );
    model.operations = Operations::GraphQl(roots);
    resolver.finish(&mut model.report);
    Ok(model)
}

fn object_decl(
    resolver: &mut Resolver<'_>,
    parent: &str,
    description: Option<String>,
    fields: &[Field<'static, String>],
    interfaces: Vec<String>,
) -> ObjectDecl {
    let fields = fields
        .iter()
        .map(|field| {
            let site = format!("{parent}.{}", field.name);
            let required = is_non_null(&field.field_type);
            FieldDecl {
                name: field.name.clone(),
                rename: None,
                description: field.description.clone(),
                ty: resolver.resolve(&site, &field.field_type, required, Context::ObjectField),
                required,
                arguments: field
                    .arguments
                    .iter()
                    .map(|arg| arg_decl(resolver, &site, arg, Context::Root))
                    .collect(),
            }
        })
        .collect();
    ObjectDecl {
        name: parent.to_string(),
        description,
        fields,
        interfaces,
    }
}

fn arg_decl(
    resolver: &mut Resolver<'_>,
    parent: &str,
    input: &InputValue<'static, String>,
    context: Context,
) -> ArgDecl {
    let site = format!("{parent}.{}", input.name);
    ArgDecl {
        name: input.name.clone(),
        description: input.description.clone(),
        ty: resolver.resolve(&site, &input.value_type, is_non_null(&input.value_type), context),
        declared_type: render_type(&input.value_type),
        default_value: input.default_value.as_ref().map(render_value),
    }
}

/// Split the root types' fields into the three operation sequences,
/// preserving declaration order.
fn group_operations(
    doc: &GraphqlDocument,
    resolver: &mut Resolver<'_>,
    model: &SchemaModel,
    selection_depth: usize,
) -> RootOperations {
    let selections = SelectionBuilder::new(&model.objects, &model.unions, selection_depth);
    let mut collect = |root: &str| -> Vec<GraphqlOperation> {
        let Some(TypeDefinition::Object(root_type)) = doc.types.get(root) else {
            return Vec::new();
        };
        root_type
            .fields
            .iter()
            .map(|field| {
                let site = format!("{root}.{}", field.name);
                let ty = resolver.resolve(
                    &site,
                    &field.field_type,
                    is_non_null(&field.field_type),
                    Context::Root,
                );
                GraphqlOperation {
                    name: field.name.clone(),
                    function_name: exported_name(&field.name),
                    description: field.description.clone(),
                    arguments: field
                        .arguments
                        .iter()
                        .map(|arg| arg_decl(resolver, &site, arg, Context::Root))
                        .collect(),
                    selection: selections.build(&ty),
                    ty,
                }
            })
            .collect()
    };
    let mut roots = RootOperations {
        queries: collect(&doc.roots.query),
        mutations: collect(&doc.roots.mutation),
        subscriptions: collect(&doc.roots.subscription),
    };
    dedupe_function_names(&mut roots);
    roots
}

/// Queries keep the bare field name. A mutation or subscription whose name
/// is already taken gets its root kind appended, then a counter.
fn dedupe_function_names(roots: &mut RootOperations) {
    let mut taken = HashSet::new();
    let groups = [
        (&mut roots.queries, "Query"),
        (&mut roots.mutations, "Mutation"),
        (&mut roots.subscriptions, "Subscription"),
    ];
    for (ops, kind) in groups {
        for op in ops.iter_mut() {
            if taken.contains(&op.function_name) {
                let base = format!("{}{kind}", op.function_name);
                let mut candidate = base.clone();
                let mut n = 2;
                while taken.contains(&candidate) {
                    candidate = format!("{base}{n}");
                    n += 1;
                }
                debug!(
                    operation = %op.name,
                    function = %candidate,
                    "Renamed colliding operation method."
                );
                op.function_name = candidate;
            }
            taken.insert(op.function_name.clone());
        }
    }
}

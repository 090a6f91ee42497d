use std::collections::BTreeMap;

use tracing::warn;

use super::{Category, Classification};
use crate::model::{BuiltinScalar, GenerationReport, TypeDescriptor, TypeKind, UnresolvedRef};

/// Format-specific view of one raw field-type annotation.
pub trait FieldAnnotation {
    /// `Some(element)` when this occurrence is a list/array wrapper. The
    /// inner `None` means the schema left the element type out.
    fn list_element(&self) -> Option<Option<&Self>>;

    /// Whether a list element or map value is non-null.
    fn element_required(&self, element: &Self) -> bool;

    fn builtin(&self, scalars: &ScalarTable) -> Option<BuiltinScalar>;

    /// Schema pointer of a named reference.
    fn pointer(&self) -> Option<String>;

    /// `Some(values)` when the node is an `additionalProperties` map. The
    /// inner `None` means values are free-form.
    fn additional_properties(&self) -> Option<Option<&Self>> {
        None
    }
}

/// Where an occurrence sits; selects union instancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Operation return types and arguments.
    Root,
    /// A field inside an object's field list.
    ObjectField,
}

/// Names with a fixed primitive mapping.
#[derive(Debug, Clone, Default)]
pub struct ScalarTable {
    entries: BTreeMap<String, BuiltinScalar>,
}

impl ScalarTable {
    /// GraphQL base scalars plus configured extensions such as `Time`.
    pub fn graphql(extensions: &BTreeMap<String, BuiltinScalar>) -> Self {
        let mut entries: BTreeMap<String, BuiltinScalar> = [
            ("Int", BuiltinScalar::Integer),
            ("Float", BuiltinScalar::Float),
            ("String", BuiltinScalar::String),
            ("Boolean", BuiltinScalar::Boolean),
            ("ID", BuiltinScalar::Id),
        ]
        .into_iter()
        .map(|(name, scalar)| (name.to_string(), scalar))
        .collect();
        entries.extend(extensions.iter().map(|(k, v)| (k.clone(), *v)));
        Self { entries }
    }

    /// OpenAPI `type`/`format` keywords.
    pub fn openapi() -> Self {
        let entries = [
            "string",
            "boolean",
            "integer",
            "int32",
            "int64",
            "number",
            "double",
            "float",
            "date-time",
            "date",
        ]
        .into_iter()
        .filter_map(|k| BuiltinScalar::from_keyword(k).map(|s| (k.to_string(), s)))
        .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<BuiltinScalar> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// Turns field annotations into [`TypeDescriptor`]s.
///
/// References resolve to names only, so resolution terminates on cyclic
/// declaration graphs. Pointers missing from the index, and pointers to
/// declarations that are never emitted as types (operation roots, bodiless
/// responses), fall back to [`TypeKind::Unknown`] and are recorded for the
/// generation report.
#[derive(Debug)]
pub struct Resolver<'a> {
    names: &'a BTreeMap<String, String>,
    classes: &'a Classification,
    scalars: &'a ScalarTable,
    unresolved: Vec<UnresolvedRef>,
    unclassified: Vec<UnresolvedRef>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        names: &'a BTreeMap<String, String>,
        classes: &'a Classification,
        scalars: &'a ScalarTable,
    ) -> Self {
        Self {
            names,
            classes,
            scalars,
            unresolved: Vec::new(),
            unclassified: Vec::new(),
        }
    }

    /// Resolve one occurrence. `site` names the occurrence in diagnostics.
    pub fn resolve<A: FieldAnnotation>(
        &mut self,
        site: &str,
        annotation: &A,
        required: bool,
        context: Context,
    ) -> TypeDescriptor {
        self.resolve_occurrence(site, annotation, required, context, false)
    }

    fn resolve_occurrence<A: FieldAnnotation>(
        &mut self,
        site: &str,
        annotation: &A,
        required: bool,
        context: Context,
        in_list: bool,
    ) -> TypeDescriptor {
        let nullable = !required;

        if let Some(element) = annotation.list_element() {
            let element = match element {
                Some(element) => self.resolve_occurrence(
                    site,
                    element,
                    annotation.element_required(element),
                    context,
                    true,
                ),
                None => TypeDescriptor::unknown(),
            };
            return TypeDescriptor::list(element, nullable);
        }

        if let Some(scalar) = annotation.builtin(self.scalars) {
            return TypeDescriptor::builtin(scalar, nullable);
        }

        if let Some(pointer) = annotation.pointer() {
            return self.resolve_pointer(site, &pointer, nullable, context, in_list);
        }

        if let Some(values) = annotation.additional_properties() {
            let element = match values {
                Some(values) => self.resolve_occurrence(
                    site,
                    values,
                    annotation.element_required(values),
                    context,
                    false,
                ),
                None => TypeDescriptor::unknown(),
            };
            return TypeDescriptor::map(element, nullable);
        }

        TypeDescriptor::new(TypeKind::Unknown, nullable)
    }

    fn resolve_pointer(
        &mut self,
        site: &str,
        pointer: &str,
        nullable: bool,
        context: Context,
        in_list: bool,
    ) -> TypeDescriptor {
        let Some(name) = self.names.get(pointer) else {
            warn!(pointer, site, "Unresolved schema reference, falling back to Unknown.");
            self.unresolved.push(UnresolvedRef {
                pointer: pointer.to_string(),
                site: site.to_string(),
            });
            return TypeDescriptor::new(TypeKind::Unknown, nullable);
        };
        let name = name.clone();
        let Some(category) = self.classes.category(&name) else {
            warn!(
                pointer,
                site,
                declaration = %name,
                "Reference to a declaration without a type, falling back to Unknown."
            );
            self.unclassified.push(UnresolvedRef {
                pointer: pointer.to_string(),
                site: site.to_string(),
            });
            return TypeDescriptor::new(TypeKind::Unknown, nullable);
        };
        let kind = match category {
            Category::Object | Category::Input => TypeKind::ObjectRef { name },
            Category::Union => TypeKind::UnionRef {
                name,
                instance: context == Context::ObjectField && in_list,
            },
            Category::Enum => TypeKind::EnumRef { name },
            Category::Scalar => TypeKind::Scalar { name },
        };
        TypeDescriptor::new(kind, nullable)
    }

    pub fn unresolved(&self) -> &[UnresolvedRef] {
        &self.unresolved
    }

    pub fn unclassified(&self) -> &[UnresolvedRef] {
        &self.unclassified
    }

    /// Move the recorded fallbacks into `report`.
    pub fn finish(self, report: &mut GenerationReport) {
        report.unresolved_refs = self.unresolved;
        report.unclassified_refs = self.unclassified;
    }
}

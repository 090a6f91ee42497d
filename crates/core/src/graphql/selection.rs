//! Precomputed selection sets for GraphQL operation documents.

use std::collections::BTreeMap;

use crate::model::{ObjectDecl, TypeDescriptor, TypeKind, UnionDecl};

/// Expands the selection set of a returned type, e.g. `{ id author { name } }`.
///
/// Objects expand field by field up to `depth` levels and never re-enter a
/// type already on the current path. Unions expand into `... on Member`
/// fragments. Fields that require arguments, and fields whose type fell back
/// to `Unknown`, are left out. Leaf types yield an empty string.
#[derive(Debug)]
pub struct SelectionBuilder<'a> {
    objects: &'a BTreeMap<String, ObjectDecl>,
    unions: &'a BTreeMap<String, UnionDecl>,
    depth: usize,
}

impl<'a> SelectionBuilder<'a> {
    pub fn new(
        objects: &'a BTreeMap<String, ObjectDecl>,
        unions: &'a BTreeMap<String, UnionDecl>,
        depth: usize,
    ) -> Self {
        Self {
            objects,
            unions,
            depth: depth.max(1),
        }
    }

    pub fn build(&self, ty: &TypeDescriptor) -> String {
        let mut path = Vec::new();
        self.selection(ty, self.depth, &mut path).unwrap_or_default()
    }

    /// `None` when the type needs a sub-selection that cannot be expanded.
    fn selection(
        &self,
        ty: &TypeDescriptor,
        remaining: usize,
        path: &mut Vec<&'a str>,
    ) -> Option<String> {
        match &ty.innermost().kind {
            TypeKind::ObjectRef { name } => self.object_selection(name, remaining, path),
            TypeKind::UnionRef { name, .. } => self.union_selection(name, remaining, path),
            TypeKind::Unknown => None,
            _ => Some(String::new()),
        }
    }

    fn object_selection(
        &self,
        name: &str,
        remaining: usize,
        path: &mut Vec<&'a str>,
    ) -> Option<String> {
        let (key, object) = self.objects.get_key_value(name)?;
        if remaining == 0 || path.contains(&key.as_str()) {
            return None;
        }
        path.push(key);
        let mut parts = Vec::new();
        for field in &object.fields {
            if field.arguments.iter().any(|arg| arg.is_required()) {
                continue;
            }
            match self.selection(&field.ty, remaining - 1, path) {
                Some(sub) if sub.is_empty() => parts.push(field.name.clone()),
                Some(sub) => parts.push(format!("{} {sub}", field.name)),
                None => {}
            }
        }
        path.pop();
        if parts.is_empty() {
            parts.push("__typename".to_string());
        }
        Some(format!("{{ {} }}", parts.join(" ")))
    }

    fn union_selection(
        &self,
        name: &str,
        remaining: usize,
        path: &mut Vec<&'a str>,
    ) -> Option<String> {
        let union = self.unions.get(name)?;
        if remaining == 0 {
            return None;
        }
        let mut parts = vec!["__typename".to_string()];
        for member in &union.members {
            if let Some(sub) = self.object_selection(member, remaining, path) {
                parts.push(format!("... on {member} {sub}"));
            }
        }
        Some(format!("{{ {} }}", parts.join(" ")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{ArgDecl, BuiltinScalar, FieldDecl};

    fn field(name: &str, ty: TypeDescriptor) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            rename: None,
            description: None,
            ty,
            required: false,
            arguments: Vec::new(),
        }
    }

    fn object(name: &str, fields: Vec<FieldDecl>) -> (String, ObjectDecl) {
        (
            name.to_string(),
            ObjectDecl {
                name: name.into(),
                description: None,
                fields,
                interfaces: Vec::new(),
            },
        )
    }

    fn obj_ref(name: &str) -> TypeDescriptor {
        TypeDescriptor::new(TypeKind::ObjectRef { name: name.into() }, true)
    }

    fn string() -> TypeDescriptor {
        TypeDescriptor::builtin(BuiltinScalar::String, true)
    }

    fn fixture() -> (BTreeMap<String, ObjectDecl>, BTreeMap<String, UnionDecl>) {
        let mut search = field("search", string());
        search.arguments.push(ArgDecl {
            name: "term".into(),
            description: None,
            ty: TypeDescriptor::builtin(BuiltinScalar::String, false),
            declared_type: "String!".into(),
            default_value: None,
        });
        let objects = BTreeMap::from([
            object(
                "User",
                vec![
                    field("name", string()),
                    field("posts", TypeDescriptor::list(obj_ref("Post"), true)),
                    search,
                ],
            ),
            object(
                "Post",
                vec![field("title", string()), field("author", obj_ref("User"))],
            ),
        ]);
        let unions = BTreeMap::from([(
            "Feed".to_string(),
            UnionDecl {
                name: "Feed".into(),
                description: None,
                members: vec!["Post".into(), "User".into()],
            },
        )]);
        (objects, unions)
    }

    #[test]
    fn test_cycles_stop_at_types_on_the_path() {
        let (objects, unions) = fixture();
        let builder = SelectionBuilder::new(&objects, &unions, 5);
        assert_eq!(
            builder.build(&obj_ref("Post")),
            "{ title author { name } }"
        );
    }

    #[test]
    fn test_depth_limits_expansion() {
        let (objects, unions) = fixture();
        let builder = SelectionBuilder::new(&objects, &unions, 1);
        assert_eq!(builder.build(&obj_ref("User")), "{ name }");
    }

    #[test]
    fn test_union_expands_into_fragments() {
        let (objects, unions) = fixture();
        let builder = SelectionBuilder::new(&objects, &unions, 2);
        let feed = TypeDescriptor::new(
            TypeKind::UnionRef {
                name: "Feed".into(),
                instance: false,
            },
            true,
        );
        assert_eq!(
            builder.build(&TypeDescriptor::list(feed, false)),
            "{ __typename ... on Post { title author { name } } ... on User { name posts { title } } }"
        );
    }

    #[test]
    fn test_leaf_types_have_no_selection() {
        let (objects, unions) = fixture();
        let builder = SelectionBuilder::new(&objects, &unions, 3);
        assert_eq!(builder.build(&string()), "");
    }

    #[test]
    fn test_unknown_fields_are_not_selected() {
        let (mut objects, unions) = fixture();
        let (name, payload) = object(
            "Payload",
            vec![
                field("post", obj_ref("Post")),
                field("query", TypeDescriptor::new(TypeKind::Unknown, false)),
            ],
        );
        objects.insert(name, payload);
        let builder = SelectionBuilder::new(&objects, &unions, 2);
        assert_eq!(builder.build(&obj_ref("Payload")), "{ post { title } }");
        assert_eq!(builder.build(&TypeDescriptor::unknown()), "");
    }
}

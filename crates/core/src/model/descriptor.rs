//! Canonical, target-language-neutral description of one type occurrence.
//!
//! References to declared types are kept by name. A descriptor never embeds
//! the structure of another declaration, so cyclic schemas stay finite.

use serde::{Deserialize, Serialize};

/// Scalars with a fixed mapping to a target primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinScalar {
    String,
    #[serde(alias = "int", alias = "int32", alias = "int64")]
    Integer,
    #[serde(alias = "number", alias = "double")]
    Float,
    #[serde(alias = "bool")]
    Boolean,
    Id,
    DateTime,
    Date,
}

impl BuiltinScalar {
    /// Look up an OpenAPI `type` or `format` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "integer" | "int32" | "int64" => Some(Self::Integer),
            "number" | "double" | "float" => Some(Self::Float),
            "date-time" => Some(Self::DateTime),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// Custom scalar with no known structure.
    Scalar { name: String },
    #[serde(rename = "builtin")]
    BuiltIn { scalar: BuiltinScalar },
    ObjectRef { name: String },
    /// `instance` selects the concrete carrier shape instead of the abstract union.
    UnionRef { name: String, instance: bool },
    EnumRef { name: String },
    List { element: Box<TypeDescriptor> },
    /// String-keyed map; `element` is the value type.
    Map { element: Box<TypeDescriptor> },
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(flatten)]
    pub kind: TypeKind,
    pub nullable: bool,
}

/// Suffix carried by the concrete carrier type of a union.
pub const UNION_INSTANCE_SUFFIX: &str = "Instance";

impl TypeDescriptor {
    pub fn new(kind: TypeKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    /// The generic fallback for untyped or unresolvable nodes.
    pub fn unknown() -> Self {
        Self::new(TypeKind::Unknown, true)
    }

    pub fn builtin(scalar: BuiltinScalar, nullable: bool) -> Self {
        Self::new(TypeKind::BuiltIn { scalar }, nullable)
    }

    pub fn list(element: Self, nullable: bool) -> Self {
        Self::new(
            TypeKind::List {
                element: Box::new(element),
            },
            nullable,
        )
    }

    pub fn map(element: Self, nullable: bool) -> Self {
        Self::new(
            TypeKind::Map {
                element: Box::new(element),
            },
            nullable,
        )
    }

    /// Declared name this occurrence points at, with the union instance suffix applied.
    pub fn reference_name(&self) -> Option<String> {
        match &self.kind {
            TypeKind::ObjectRef { name } | TypeKind::EnumRef { name } => Some(name.clone()),
            TypeKind::UnionRef { name, instance } => Some(if *instance {
                format!("{name}{UNION_INSTANCE_SUFFIX}")
            } else {
                name.clone()
            }),
            _ => None,
        }
    }

    /// Element type of a list or value type of a map.
    pub fn element(&self) -> Option<&Self> {
        match &self.kind {
            TypeKind::List { element } | TypeKind::Map { element } => Some(element),
            _ => None,
        }
    }

    /// Innermost descriptor below any list and map wrappers.
    pub fn innermost(&self) -> &Self {
        let mut current = self;
        while let Some(element) = current.element() {
            current = element;
        }
        current
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, TypeKind::Unknown)
    }

    /// Calls `visit` on this descriptor and every nested element.
    pub fn walk(&self, visit: &mut impl FnMut(&Self)) {
        visit(self);
        if let Some(element) = self.element() {
            element.walk(visit);
        }
    }
}

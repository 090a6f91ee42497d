//! OpenAPI (Swagger 2) -> [`SchemaModel`].
//!
//! The pipeline is:
//! 1. Load: YAML/JSON -> [`SwaggerDocument`]
//! 2. Index: `#/definitions/<n>` and `#/responses/<n>` -> name and schema
//! 3. Normalize: classify declarations, resolve every property
//! 4. Group: path x method operations fanned out by tag

mod normalize;
mod operations;
mod spec;

use crate::model::BuiltinScalar;
use crate::resolve::{Category, DeclarationBody, FieldAnnotation, ScalarTable};

pub use normalize::build_model;
pub use spec::{
    AdditionalProperties, Info, Operation, Parameter, PathItem, Response, Schema, SwaggerDocument,
};

pub const DEFINITIONS_PREFIX: &str = "#/definitions/";
pub const RESPONSES_PREFIX: &str = "#/responses/";

impl FieldAnnotation for Schema {
    fn list_element(&self) -> Option<Option<&Self>> {
        self.is_array().then(|| self.items.as_deref())
    }

    fn element_required(&self, element: &Self) -> bool {
        !element.x_nullable
    }

    /// `format` is consulted before `type`, so `integer/int64` and
    /// `string/date-time` map to their most specific builtin.
    fn builtin(&self, scalars: &ScalarTable) -> Option<BuiltinScalar> {
        self.format
            .as_deref()
            .and_then(|format| scalars.get(format))
            .or_else(|| self.schema_type.as_deref().and_then(|ty| scalars.get(ty)))
    }

    fn pointer(&self) -> Option<String> {
        self.ref_path.clone()
    }

    fn additional_properties(&self) -> Option<Option<&Self>> {
        if !matches!(self.schema_type.as_deref(), None | Some("object")) {
            return None;
        }
        match &self.additional_properties {
            Some(AdditionalProperties::Schema(values)) => Some(Some(&**values)),
            Some(AdditionalProperties::Bool(true)) => Some(None),
            Some(AdditionalProperties::Bool(false)) | None => None,
        }
    }
}

impl DeclarationBody for Schema {
    fn category(&self) -> Category {
        if self.enum_values.is_some() {
            return Category::Enum;
        }
        if self.properties.is_some() {
            return Category::Object;
        }
        let is_object = self.schema_type.as_deref() == Some("object");
        let has_map = matches!(
            self.additional_properties,
            Some(AdditionalProperties::Schema(_) | AdditionalProperties::Bool(true))
        );
        if is_object && !has_map {
            Category::Object
        } else {
            Category::Scalar
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn schema(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_format_wins_over_type() {
        let table = ScalarTable::openapi();
        let ts = schema(r#"{"type": "string", "format": "date-time"}"#);
        assert_eq!(ts.builtin(&table), Some(BuiltinScalar::DateTime));

        let uuid = schema(r#"{"type": "string", "format": "uuid"}"#);
        assert_eq!(uuid.builtin(&table), Some(BuiltinScalar::String));

        let object = schema(r#"{"type": "object"}"#);
        assert_eq!(object.builtin(&table), None);
    }

    #[test]
    fn test_declaration_categories() {
        let cases = [
            (r#"{"type": "string", "enum": ["a", "b"]}"#, Category::Enum),
            (r#"{"properties": {"id": {"type": "integer"}}}"#, Category::Object),
            (r#"{"type": "object"}"#, Category::Object),
            (
                r#"{"type": "object", "additionalProperties": {"type": "string"}}"#,
                Category::Scalar,
            ),
            (r#"{"type": "array", "items": {"type": "string"}}"#, Category::Scalar),
            (r#"{"type": "string"}"#, Category::Scalar),
        ];
        for (json, expected) in cases {
            assert_eq!(schema(json).category(), expected, "{json}");
        }
    }

    #[test]
    fn test_array_items_nullability() {
        let array = schema(r#"{"type": "array", "items": {"type": "string", "x-nullable": true}}"#);
        let element = array.list_element().unwrap().unwrap();
        assert!(!array.element_required(element));

        let bare = schema(r#"{"type": "array"}"#);
        assert_eq!(bare.list_element().map(|element| element.is_some()), Some(false));
    }
}

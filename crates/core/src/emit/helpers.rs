//! Template helpers registered on each run's `Tera` instance.
//!
//! Every helper is a pure function of its arguments and the finished model.
//! They format; none of them walks the schema.

use std::collections::HashMap;
use std::sync::Arc;

use tera::{Tera, Value};
use tracing::warn;

use super::go;
use crate::model::{FieldDecl, SchemaModel, TypeDescriptor};
use crate::naming::{sanitize_go_identifier, to_camel_case, to_pascal_case};

type Args = HashMap<String, Value>;

pub(super) fn register(tera: &mut Tera, model: &Arc<SchemaModel>) {
    register_filters(tera);

    let m = Arc::clone(model);
    tera.register_function("go_type", move |args: &Args| -> tera::Result<Value> {
        let ty = descriptor_arg(args, "go_type", "ty")?;
        let parent = optional_str(args, "parent");
        Ok(Value::String(go::go_type(&m, &ty, parent)))
    });

    let m = Arc::clone(model);
    tera.register_function("needs_pointer", move |args: &Args| -> tera::Result<Value> {
        let ty = descriptor_arg(args, "needs_pointer", "ty")?;
        Ok(Value::Bool(go::needs_pointer(&m, &ty, optional_str(args, "parent"))))
    });

    let m = Arc::clone(model);
    tera.register_function("is_last_value", move |args: &Args| -> tera::Result<Value> {
        let name = str_arg(args, "is_last_value", "enum")?;
        let value = str_arg(args, "is_last_value", "value")?;
        let decl = m
            .enums
            .get(name)
            .ok_or_else(|| tera::Error::msg(format!("`is_last_value`: unknown enum `{name}`")))?;
        Ok(Value::Bool(
            decl.values.last().is_some_and(|last| last.name == value),
        ))
    });

    tera.register_function("doc_comment", |args: &Args| -> tera::Result<Value> {
        let name = str_arg(args, "doc_comment", "name")?;
        let indent = args.get("indent").and_then(Value::as_u64).unwrap_or(0);
        let indent = usize::try_from(indent).unwrap_or_default();
        Ok(Value::String(doc_comment(
            name,
            optional_str(args, "text"),
            indent,
        )))
    });

    let m = Arc::clone(model);
    tera.register_function("union_fields", move |args: &Args| -> tera::Result<Value> {
        let name = str_arg(args, "union_fields", "union")?;
        let fields = union_fields(&m, name)?;
        tera::to_value(fields).map_err(tera::Error::from)
    });

    tera.register_function("field_name", |args: &Args| -> tera::Result<Value> {
        let field = args
            .get("field")
            .ok_or_else(|| missing("field_name", "field"))?;
        let rename = field.get("rename").and_then(Value::as_str);
        let name = field.get("name").and_then(Value::as_str).unwrap_or_default();
        Ok(Value::String(
            rename.map_or_else(|| go::exported_name(name), str::to_string),
        ))
    });

    tera.register_function("go_literal", |args: &Args| -> tera::Result<Value> {
        let value = args
            .get("value")
            .ok_or_else(|| missing("go_literal", "value"))?;
        Ok(Value::String(go::go_literal(value)))
    });
}

fn register_filters(tera: &mut Tera) {
    tera.register_filter("pascal_case", |value: &Value, _: &Args| -> tera::Result<Value> {
        Ok(Value::String(to_pascal_case(filter_input(value, "pascal_case")?)))
    });
    tera.register_filter("camel_case", |value: &Value, _: &Args| -> tera::Result<Value> {
        Ok(Value::String(to_camel_case(filter_input(value, "camel_case")?)))
    });
    tera.register_filter("go_ident", |value: &Value, _: &Args| -> tera::Result<Value> {
        Ok(Value::String(sanitize_go_identifier(filter_input(
            value, "go_ident",
        )?)))
    });
    tera.register_filter("go_name", |value: &Value, _: &Args| -> tera::Result<Value> {
        Ok(Value::String(go::exported_name(filter_input(value, "go_name")?)))
    });
}

/// `// Name: text` lines, or nothing when there is no text.
pub(crate) fn doc_comment(name: &str, text: Option<&str>, indent: usize) -> String {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return String::new();
    };
    let pad = "\t".repeat(indent);
    let mut out = String::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        out.push_str(&pad);
        match (i, line.is_empty()) {
            (0, _) => out.push_str(&format!("// {name}: {line}")),
            (_, true) => out.push_str("//"),
            (_, false) => out.push_str(&format!("// {line}")),
        }
        out.push('\n');
    }
    out
}

/// Fields of every member of `union`, first occurrence wins, all nullable.
///
/// A name declared by several members with different types is carried as
/// `Unknown`.
pub(crate) fn union_fields(model: &SchemaModel, union: &str) -> tera::Result<Vec<FieldDecl>> {
    let decl = model
        .unions
        .get(union)
        .ok_or_else(|| tera::Error::msg(format!("`union_fields`: unknown union `{union}`")))?;
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut fields: Vec<FieldDecl> = Vec::new();
    for member in &decl.members {
        let Some(object) = model.objects.get(member) else {
            continue;
        };
        for field in &object.fields {
            if let Some(&i) = positions.get(field.name.as_str()) {
                let merged = &mut fields[i];
                if merged.ty.kind != field.ty.kind && !merged.ty.is_unknown() {
                    warn!(
                        union = %union,
                        member = %member,
                        field = %field.name,
                        "Union members disagree on a field type, carrying it untyped."
                    );
                    merged.ty = TypeDescriptor::unknown();
                }
                continue;
            }
            positions.insert(field.name.as_str(), fields.len());
            let mut field = field.clone();
            field.ty.nullable = true;
            fields.push(field);
        }
    }
    Ok(fields)
}

fn missing(helper: &str, arg: &str) -> tera::Error {
    tera::Error::msg(format!("`{helper}` requires a `{arg}` argument"))
}

fn str_arg<'a>(args: &'a Args, helper: &str, arg: &str) -> tera::Result<&'a str> {
    args.get(arg)
        .ok_or_else(|| missing(helper, arg))?
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("`{helper}`: `{arg}` must be a string")))
}

fn optional_str<'a>(args: &'a Args, arg: &str) -> Option<&'a str> {
    args.get(arg).and_then(Value::as_str)
}

fn descriptor_arg(args: &Args, helper: &str, arg: &str) -> tera::Result<TypeDescriptor> {
    let value = args.get(arg).ok_or_else(|| missing(helper, arg))?;
    serde_json::from_value(value.clone()).map_err(|err| {
        tera::Error::msg(format!("`{helper}`: `{arg}` is not a type descriptor: {err}"))
    })
}

fn filter_input<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("filter `{filter}` expects a string")))
}

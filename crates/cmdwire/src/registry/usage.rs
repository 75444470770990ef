//! One-line usage text for registered methods.
//!
//! Required fields come first, separated by spaces; optional fields follow
//! in parentheses. Text fields are quoted, composites render as a JSON-like
//! example, and declared defaults are shown as `name=value`:
//!
//! ```text
//! getblock "hash" (verbose=true)
//! createrawtransaction [{"txid":"value","vout":n},...] {"key":n,...} (locktime)
//! ```

use crate::schema::{FieldDescriptor, TypeDescriptor};
use crate::types::FieldType;
use crate::value::Value;

pub(super) fn method_usage(method: &str, descriptor: &TypeDescriptor) -> String {
    let (optional, required): (Vec<&FieldDescriptor>, Vec<&FieldDescriptor>) = descriptor
        .fields()
        .iter()
        .partition(|field| field.is_optional());

    let mut usage = String::from(method);
    for field in required {
        usage.push(' ');
        usage.push_str(&field_usage(field));
    }
    if !optional.is_empty() {
        let rendered: Vec<String> = optional.into_iter().map(field_usage).collect();
        usage.push_str(" (");
        usage.push_str(&rendered.join(" "));
        usage.push(')');
    }
    usage
}

fn field_usage(field: &FieldDescriptor) -> String {
    let name = field.name();
    if let Some(default) = field.default_value().and_then(render_default) {
        return format!("{name}={default}");
    }
    let (base, _) = field.ty().peel_refs();
    match base.unnamed() {
        FieldType::String => format!("\"{name}\""),
        composite if composite.is_composite() => type_example(composite),
        _ => name.to_owned(),
    }
}

fn type_example(ty: &FieldType) -> String {
    match ty {
        FieldType::Bool => String::from("true|false"),
        FieldType::Int(_) | FieldType::Float(_) => String::from("n"),
        FieldType::String => String::from("\"value\""),
        FieldType::Named { inner, .. } | FieldType::Ref(inner) => type_example(inner),
        FieldType::Seq(element) | FieldType::Array { element, .. } => {
            format!("[{},...]", type_example(element))
        }
        FieldType::Map(element) => format!("{{\"key\":{},...}}", type_example(element)),
        FieldType::Record(members) => {
            let rendered: Vec<String> = members
                .iter()
                .map(|member| format!("\"{}\":{}", member.name(), type_example(member.ty())))
                .collect();
            format!("{{{}}}", rendered.join(","))
        }
    }
}

fn render_default(value: &Value) -> Option<String> {
    value
        .to_json()
        .ok()
        .and_then(|json| serde_json::to_string(&json).ok())
}

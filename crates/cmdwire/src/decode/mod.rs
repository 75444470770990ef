//! Structural decoding of JSON documents into typed values.
//!
//! Two entry points exist. [`decode_document`] is strict and produces a
//! value that [`FieldType::admits`] exactly; it backs both text-to-composite
//! coercion and composite request parameters. [`decode_param`] is the
//! generic per-parameter decode used by the unmarshaler: scalar parameters
//! come back as their natural value and are converted afterwards by the
//! coercion engine.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::types::{FieldType, FloatKind};
use crate::value::Value;

/// Decodes `json` strictly into `ty`.
///
/// Integers must be integral literals that fit the kind, `f32` values must
/// not overflow, fixed arrays must have the exact length, and `null` is only
/// accepted by indirection layers. Records ignore unknown keys and fill
/// missing members with their zero value.
///
/// # Errors
///
/// Returns a description of the first structural mismatch.
pub fn decode_document(json: &Json, ty: &FieldType) -> Result<Value, String> {
    match ty {
        FieldType::Ref(inner) => match json {
            Json::Null => Ok(Value::Nil),
            other => decode_document(other, inner).map(Value::boxed),
        },
        FieldType::Named { name, inner } => Ok(Value::Named {
            name: name.clone(),
            value: Box::new(decode_document(json, inner)?),
        }),
        FieldType::Bool => json.as_bool().map(Value::Bool).ok_or_else(|| expected(ty, json)),
        FieldType::String => json
            .as_str()
            .map(|text| Value::Str(text.to_owned()))
            .ok_or_else(|| expected(ty, json)),
        FieldType::Int(kind) => {
            let number = integer_literal(json).ok_or_else(|| expected(ty, json))?;
            Value::int_of_kind(*kind, number)
                .ok_or_else(|| format!("{number} overflows {}", kind.as_str()))
        }
        FieldType::Float(kind) => {
            let number = json.as_f64().ok_or_else(|| expected(ty, json))?;
            float_of_kind(*kind, number).ok_or_else(|| format!("{number} overflows {}", kind.as_str()))
        }
        FieldType::Seq(element) => {
            let items = json.as_array().ok_or_else(|| expected(ty, json))?;
            decode_items(items, element).map(Value::Seq)
        }
        FieldType::Array { element, len } => {
            let items = json.as_array().ok_or_else(|| expected(ty, json))?;
            if items.len() != *len {
                return Err(format!(
                    "expected {len} elements for {ty}, got {}",
                    items.len()
                ));
            }
            decode_items(items, element).map(Value::Array)
        }
        FieldType::Map(element) => {
            let object = json.as_object().ok_or_else(|| expected(ty, json))?;
            object
                .iter()
                .map(|(key, item)| Ok((key.clone(), decode_document(item, element)?)))
                .collect::<Result<BTreeMap<_, _>, String>>()
                .map(Value::Map)
        }
        FieldType::Record(members) => {
            let object = json.as_object().ok_or_else(|| expected(ty, json))?;
            members
                .iter()
                .map(|member| {
                    let value = object.get(member.name()).map_or_else(
                        || Ok(member.ty().zero_value()),
                        |item| {
                            decode_document(item, member.ty())
                                .map_err(|err| format!("member '{}': {err}", member.name()))
                        },
                    )?;
                    Ok((member.name().to_owned(), value))
                })
                .collect::<Result<Vec<_>, String>>()
                .map(Value::Record)
        }
    }
}

/// Decodes one request parameter destined for a field of type `ty`.
///
/// Composite destinations decode structurally through
/// [`decode_document`]. Scalar destinations produce the natural value of
/// the document: booleans, text, and numbers (as `f64` when the destination
/// is floating point, otherwise `i64`/`u64` for integral literals). `null`
/// decodes to [`Value::Nil`].
///
/// # Errors
///
/// Returns a description of the mismatch when the document cannot be a
/// value of `ty` at all.
pub fn decode_param(json: &Json, ty: &FieldType) -> Result<Value, String> {
    let (base, _) = ty.peel_refs();
    if json.is_null() {
        return Ok(Value::Nil);
    }
    if base.is_composite() {
        return decode_document(json, base);
    }
    let float_destination = matches!(base.unnamed(), FieldType::Float(_));
    match json {
        Json::Bool(flag) => Ok(Value::Bool(*flag)),
        Json::String(text) => Ok(Value::Str(text.clone())),
        Json::Number(number) if float_destination => number
            .as_f64()
            .map(Value::F64)
            .ok_or_else(|| expected(ty, json)),
        Json::Number(number) => number
            .as_i64()
            .map(Value::I64)
            .or_else(|| number.as_u64().map(Value::U64))
            .or_else(|| number.as_f64().map(Value::F64))
            .ok_or_else(|| expected(ty, json)),
        Json::Null | Json::Array(_) | Json::Object(_) => Err(expected(ty, json)),
    }
}

fn decode_items(items: &[Json], element: &FieldType) -> Result<Vec<Value>, String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode_document(item, element).map_err(|err| format!("element {index}: {err}"))
        })
        .collect()
}

fn integer_literal(json: &Json) -> Option<i128> {
    let Json::Number(number) = json else {
        return None;
    };
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

pub(crate) fn float_of_kind(kind: FloatKind, value: f64) -> Option<Value> {
    match kind {
        FloatKind::F64 => Some(Value::F64(value)),
        FloatKind::F32 => narrow_to_f32(value).map(Value::F32),
    }
}

/// Narrows `value` to `f32`, refusing finite values beyond `f32::MAX`.
pub(crate) fn narrow_to_f32(value: f64) -> Option<f32> {
    if value.is_finite() && value.abs() > f64::from(f32::MAX) {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "magnitude is checked above; precision loss matches IEEE narrowing"
    )]
    let narrowed = value as f32;
    Some(narrowed)
}

fn expected(ty: &FieldType, json: &Json) -> String {
    format!("expected {ty}, got {}", describe(json))
}

fn describe(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests;

//! Safety-checked value coercion.
//!
//! [`coerce`] converts a source [`Value`] into a value of a destination
//! [`FieldType`]. The algorithm is fixed:
//!
//! 1. peel every indirection layer off the source and the destination;
//! 2. convert the base source value into the base destination type using
//!    the decision table below;
//! 3. wrap the result in as many indirection layers as the destination
//!    declares.
//!
//! | destination                  | source                 | rule                              |
//! |------------------------------|------------------------|-----------------------------------|
//! | any                          | exactly that type      | copied                            |
//! | named type                   | any                    | converted to the underlying type  |
//! | integer                      | integer                | must be representable             |
//! | float                        | float                  | must not overflow                 |
//! | bool                         | bool or text           | text must be `true` or `false`    |
//! | integer / float              | text                   | parsed with overflow checks       |
//! | string                       | text                   | copied                            |
//! | sequence, array, map, record | text                   | decoded as a JSON document        |
//!
//! Everything else, including any integer/float cross-over, is rejected
//! with [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType).

use crate::decode::{decode_document, float_of_kind};
use crate::error::CmdError;
use crate::types::{FieldType, FloatKind, IntKind};
use crate::value::Value;

mod text;

/// Describes why a single coercion failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch(String);

impl Mismatch {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    fn incompatible(dest: &FieldType, src: &Value) -> Self {
        Self(format!("must be type {dest} (got {})", src.type_name()))
    }

    /// Returns the failure description.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Converts `src` into a value of type `dest`.
///
/// An absent source is accepted only by a destination with at least one
/// indirection layer, and stays absent.
///
/// # Errors
///
/// Returns a [`Mismatch`] describing the first rule that refused the
/// conversion.
///
/// # Example
///
/// ```
/// use cmdwire::coerce::coerce;
/// use cmdwire::types::FieldType;
/// use cmdwire::value::Value;
///
/// let narrowed = coerce(&FieldType::I8, Value::I16(100)).expect("fits");
/// assert_eq!(narrowed, Value::I8(100));
/// assert!(coerce(&FieldType::I8, Value::I16(128)).is_err());
/// ```
pub fn coerce(dest: &FieldType, src: Value) -> Result<Value, Mismatch> {
    let (dest_base, layers) = dest.peel_refs();
    let Some(base) = src.peel_refs() else {
        if layers > 0 {
            return Ok(Value::Nil);
        }
        return Err(Mismatch::new(format!("must be type {dest} (got nil)")));
    };
    convert(dest_base, base).map(|value| value.wrap_refs(layers))
}

/// Coerces positional parameter `index` (zero-based) into field `name`.
///
/// # Errors
///
/// Returns an [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType)
/// error naming the one-based parameter position and the field.
pub fn assign_field(
    index: usize,
    name: &str,
    dest: &FieldType,
    src: Value,
) -> Result<Value, CmdError> {
    coerce(dest, src).map_err(|mismatch| {
        CmdError::invalid_type(format!(
            "parameter #{} '{name}' {}",
            index + 1,
            mismatch.as_str()
        ))
    })
}

fn convert(dest: &FieldType, src: Value) -> Result<Value, Mismatch> {
    if dest.admits(&src) {
        return Ok(src);
    }
    if let FieldType::Named { name, inner } = dest {
        return Ok(Value::Named {
            name: name.clone(),
            value: Box::new(convert(inner, src.unnamed())?),
        });
    }

    match (dest, src.unnamed()) {
        (FieldType::Bool, Value::Bool(flag)) => Ok(Value::Bool(flag)),
        (FieldType::Bool, Value::Str(literal)) => text::parse_bool(&literal).map(Value::Bool),
        (FieldType::String, Value::Str(literal)) => Ok(Value::Str(literal)),
        (FieldType::Int(kind), Value::Str(literal)) => text::parse_int(&literal, *kind),
        (FieldType::Float(kind), Value::Str(literal)) => text::parse_float(&literal, *kind),
        (FieldType::Int(kind), number) if number.int_kind().is_some() => {
            convert_int(*kind, &number)
        }
        (FieldType::Float(kind), number) if number.float_kind().is_some() => {
            convert_float(*kind, &number)
        }
        (composite, Value::Str(literal)) if composite.is_composite() => decode_text(composite, &literal),
        (other, value) => Err(Mismatch::incompatible(other, &value)),
    }
}

fn convert_int(kind: IntKind, src: &Value) -> Result<Value, Mismatch> {
    let value = src
        .as_i128()
        .ok_or_else(|| Mismatch::incompatible(&FieldType::Int(kind), src))?;
    if value < 0 && !kind.is_signed() {
        return Err(Mismatch::new(format!(
            "must be an unsigned integer for type {} (got {value})",
            kind.as_str()
        )));
    }
    Value::int_of_kind(kind, value).ok_or_else(|| {
        Mismatch::new(format!(
            "overflows destination type {} (got {value})",
            kind.as_str()
        ))
    })
}

fn convert_float(kind: FloatKind, src: &Value) -> Result<Value, Mismatch> {
    let value = src
        .as_f64()
        .ok_or_else(|| Mismatch::incompatible(&FieldType::Float(kind), src))?;
    float_of_kind(kind, value).ok_or_else(|| {
        Mismatch::new(format!(
            "overflows destination type {} (got {value})",
            kind.as_str()
        ))
    })
}

fn decode_text(dest: &FieldType, text: &str) -> Result<Value, Mismatch> {
    let document: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| Mismatch::new(format!("must be a JSON encoded {dest}: {err}")))?;
    decode_document(&document, dest)
        .map_err(|err| Mismatch::new(format!("must be a JSON encoded {dest}: {err}")))
}

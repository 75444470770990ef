//! Typed extraction from coerced values.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use super::Value;
use crate::error::CmdError;

/// Converts a coerced [`Value`] back into a Rust value.
///
/// Extraction is exact: by the time a command reads its fields the
/// coercion engine has already produced values of the declared types, so a
/// mismatch here means the command's schema and its Rust fields disagree.
///
/// # Example
///
/// ```
/// use cmdwire::value::{FromValue, Value};
///
/// let verbose = Option::<bool>::from_value(Value::Bool(true).boxed()).expect("bool");
/// assert_eq!(verbose, Some(true));
/// ```
pub trait FromValue: Sized {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType)
    /// error when `value` has a different shape.
    fn from_value(value: Value) -> Result<Self, CmdError>;
}

pub(crate) fn mismatch(expected: &str, got: &Value) -> CmdError {
    CmdError::invalid_type(format!(
        "expected a {expected} value, got {}",
        got.type_name()
    ))
}

macro_rules! from_value_scalar {
    ($($ty:ty => $variant:ident as $label:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, CmdError> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(mismatch($label, &other)),
                    }
                }
            }
        )*
    };
}

from_value_scalar! {
    bool => Bool as "bool",
    i8 => I8 as "i8",
    i16 => I16 as "i16",
    i32 => I32 as "i32",
    i64 => I64 as "i64",
    u8 => U8 as "u8",
    u16 => U16 as "u16",
    u32 => U32 as "u32",
    u64 => U64 as "u64",
    f32 => F32 as "f32",
    f64 => F64 as "f64",
    String => Str as "string",
}

impl FromValue for Value {
    fn from_value(value: Self) -> Result<Self, CmdError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, CmdError> {
        match value {
            Value::Nil => Ok(None),
            Value::Ref(inner) => T::from_value(*inner).map(Some),
            other => Err(mismatch("optional", &other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, CmdError> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch("sequence", &other)),
        }
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, CmdError> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch("array", &other)),
        };
        let len = items.len();
        let decoded = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Self::try_from(decoded).map_err(|_| {
            CmdError::invalid_type(format!("expected an array of {N} elements, got {len}"))
        })
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, CmdError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, item)| Ok((key, T::from_value(item)?)))
                .collect(),
            other => Err(mismatch("map", &other)),
        }
    }
}

impl<K, T, S> FromValue for HashMap<K, T, S>
where
    K: From<String> + Eq + Hash,
    T: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: Value) -> Result<Self, CmdError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, item)| Ok((K::from(key), T::from_value(item)?)))
                .collect(),
            other => Err(mismatch("map", &other)),
        }
    }
}

impl Value {
    /// Unwraps a value of the named type `name`.
    ///
    /// Newtype wrappers use this from their [`FromValue`] implementation.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType)
    /// error when the value is not of the named type.
    pub fn into_named(self, name: &str) -> Result<Self, CmdError> {
        match self {
            Self::Named { name: got, value } if got == name => Ok(*value),
            other => Err(mismatch(name, &other)),
        }
    }
}

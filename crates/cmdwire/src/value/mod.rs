//! Loosely-typed values flowing into and out of command fields.
//!
//! Callers build [`Value`]s from ordinary Rust values through the `From`
//! conversions and hand them to the constructor; command implementations
//! read coerced values back with [`FromValue`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Number;

use crate::error::CmdError;
use crate::types::{FloatKind, IntKind};

mod extract;

pub use self::extract::FromValue;

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// Text.
    Str(String),
    /// A value of a distinct named type.
    Named {
        /// Type name.
        name: String,
        /// Underlying value.
        value: Box<Value>,
    },
    /// Variable-length sequence.
    Seq(Vec<Value>),
    /// Fixed-length array.
    Array(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
    /// Record members in declaration order.
    Record(Vec<(String, Value)>),
    /// A present indirection.
    Ref(Box<Value>),
    /// An absent indirection.
    Nil,
}

impl Value {
    /// Wraps `value` in a named type.
    #[must_use]
    pub fn named(name: impl Into<String>, value: impl Into<Self>) -> Self {
        Self::Named {
            name: name.into(),
            value: Box::new(value.into()),
        }
    }

    /// Wraps `self` in one indirection layer.
    #[must_use]
    pub fn boxed(self) -> Self {
        Self::Ref(Box::new(self))
    }

    /// Returns `true` for [`Value::Nil`].
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the integer kind of an integer value.
    #[must_use]
    pub const fn int_kind(&self) -> Option<IntKind> {
        match self {
            Self::I8(_) => Some(IntKind::I8),
            Self::I16(_) => Some(IntKind::I16),
            Self::I32(_) => Some(IntKind::I32),
            Self::I64(_) => Some(IntKind::I64),
            Self::U8(_) => Some(IntKind::U8),
            Self::U16(_) => Some(IntKind::U16),
            Self::U32(_) => Some(IntKind::U32),
            Self::U64(_) => Some(IntKind::U64),
            _ => None,
        }
    }

    /// Returns the float kind of a floating-point value.
    #[must_use]
    pub const fn float_kind(&self) -> Option<FloatKind> {
        match self {
            Self::F32(_) => Some(FloatKind::F32),
            Self::F64(_) => Some(FloatKind::F64),
            _ => None,
        }
    }

    /// Returns an integer value widened to `i128`.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::I8(v) => Some(v.into()),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v.into()),
            Self::U8(v) => Some(v.into()),
            Self::U16(v) => Some(v.into()),
            Self::U32(v) => Some(v.into()),
            Self::U64(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Returns a floating-point value widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v.into()),
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Builds an integer value of `kind`, or `None` when `value` does not fit.
    #[must_use]
    pub fn int_of_kind(kind: IntKind, value: i128) -> Option<Self> {
        match kind {
            IntKind::I8 => i8::try_from(value).ok().map(Self::I8),
            IntKind::I16 => i16::try_from(value).ok().map(Self::I16),
            IntKind::I32 => i32::try_from(value).ok().map(Self::I32),
            IntKind::I64 => i64::try_from(value).ok().map(Self::I64),
            IntKind::U8 => u8::try_from(value).ok().map(Self::U8),
            IntKind::U16 => u16::try_from(value).ok().map(Self::U16),
            IntKind::U32 => u32::try_from(value).ok().map(Self::U32),
            IntKind::U64 => u64::try_from(value).ok().map(Self::U64),
        }
    }

    pub(crate) const fn zero_int(kind: IntKind) -> Self {
        match kind {
            IntKind::I8 => Self::I8(0),
            IntKind::I16 => Self::I16(0),
            IntKind::I32 => Self::I32(0),
            IntKind::I64 => Self::I64(0),
            IntKind::U8 => Self::U8(0),
            IntKind::U16 => Self::U16(0),
            IntKind::U32 => Self::U32(0),
            IntKind::U64 => Self::U64(0),
        }
    }

    /// Strips every name layer.
    #[must_use]
    pub fn unnamed(self) -> Self {
        let mut value = self;
        while let Self::Named { value: inner, .. } = value {
            value = *inner;
        }
        value
    }

    /// Strips every indirection layer, returning `None` when an absent
    /// layer is reached.
    #[must_use]
    pub fn peel_refs(self) -> Option<Self> {
        let mut value = self;
        loop {
            match value {
                Self::Ref(inner) => value = *inner,
                Self::Nil => return None,
                other => return Some(other),
            }
        }
    }

    /// Wraps `self` in `layers` indirections.
    #[must_use]
    pub fn wrap_refs(self, layers: usize) -> Self {
        (0..layers).fold(self, |value, _| value.boxed())
    }

    /// Returns a short description of the value's type for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Bool(_) => String::from("bool"),
            Self::Str(_) => String::from("string"),
            Self::Named { name, .. } => name.clone(),
            Self::Seq(_) => String::from("sequence"),
            Self::Array(items) => format!("array of {}", items.len()),
            Self::Map(_) => String::from("map"),
            Self::Record(_) => String::from("record"),
            Self::Ref(inner) => format!("Option<{}>", inner.type_name()),
            Self::Nil => String::from("nil"),
            other => other
                .int_kind()
                .map(IntKind::as_str)
                .or_else(|| other.float_kind().map(FloatKind::as_str))
                .unwrap_or("unknown")
                .to_owned(),
        }
    }

    /// Encodes the value as a JSON document.
    ///
    /// Names and indirections are transparent; an absent indirection is
    /// encoded as `null`. Records keep their declaration order.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType)
    /// error for NaN or infinite floats, which JSON cannot represent.
    pub fn to_json(&self) -> Result<serde_json::Value, CmdError> {
        use serde_json::Value as Json;

        Ok(match self {
            Self::Bool(v) => Json::Bool(*v),
            Self::I8(v) => Json::from(*v),
            Self::I16(v) => Json::from(*v),
            Self::I32(v) => Json::from(*v),
            Self::I64(v) => Json::from(*v),
            Self::U8(v) => Json::from(*v),
            Self::U16(v) => Json::from(*v),
            Self::U32(v) => Json::from(*v),
            Self::U64(v) => Json::from(*v),
            Self::F32(v) => float_to_json(f64::from(*v))?,
            Self::F64(v) => float_to_json(*v)?,
            Self::Str(v) => Json::String(v.clone()),
            Self::Named { value, .. } | Self::Ref(value) => value.to_json()?,
            Self::Seq(items) | Self::Array(items) => Json::Array(
                items
                    .iter()
                    .map(Self::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.to_json()?)))
                    .collect::<Result<_, CmdError>>()?,
            ),
            Self::Record(members) => Json::Object(
                members
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), value.to_json()?)))
                    .collect::<Result<_, CmdError>>()?,
            ),
            Self::Nil => Json::Null,
        })
    }
}

fn float_to_json(value: f64) -> Result<serde_json::Value, CmdError> {
    Number::from_f64(value)
        .map(serde_json::Value::Number)
        .ok_or_else(|| CmdError::invalid_type(format!("{value} cannot be encoded as JSON")))
}

macro_rules! value_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_from_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, |inner| inner.into().boxed())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<BTreeMap<String, T>> for Value {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Self>, S: BuildHasher> From<HashMap<String, T, S>> for Value {
    fn from(entries: HashMap<String, T, S>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

//! Structural field types.
//!
//! A [`FieldType`] describes the exact shape a command field accepts. The
//! set of shapes is closed, so registration can check a schema completely
//! before any value flows through it.

use std::fmt;

use crate::value::Value;

/// Width and signedness of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    /// Signed 8-bit.
    I8,
    /// Signed 16-bit.
    I16,
    /// Signed 32-bit.
    I32,
    /// Signed 64-bit.
    I64,
    /// Unsigned 8-bit.
    U8,
    /// Unsigned 16-bit.
    U16,
    /// Unsigned 32-bit.
    U32,
    /// Unsigned 64-bit.
    U64,
}

impl IntKind {
    /// Returns the inclusive range of values the kind can represent.
    #[must_use]
    pub fn bounds(self) -> (i128, i128) {
        match self {
            Self::I8 => (i8::MIN.into(), i8::MAX.into()),
            Self::I16 => (i16::MIN.into(), i16::MAX.into()),
            Self::I32 => (i32::MIN.into(), i32::MAX.into()),
            Self::I64 => (i64::MIN.into(), i64::MAX.into()),
            Self::U8 => (0, u8::MAX.into()),
            Self::U16 => (0, u16::MAX.into()),
            Self::U32 => (0, u32::MAX.into()),
            Self::U64 => (0, u64::MAX.into()),
        }
    }

    /// Returns `true` for the signed kinds.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns the Rust spelling of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
        }
    }
}

/// Width of a floating-point field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    /// IEEE 754 single precision.
    F32,
    /// IEEE 754 double precision.
    F64,
}

impl FloatKind {
    /// Returns the Rust spelling of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// A named member of a [`FieldType::Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMember {
    name: String,
    ty: FieldType,
}

impl RecordMember {
    /// Creates a record member.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the member name, which is also its document key.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the member type.
    #[must_use]
    pub const fn ty(&self) -> &FieldType {
        &self.ty
    }
}

/// The declared type of a command field.
///
/// # Example
///
/// ```
/// use cmdwire::types::FieldType;
///
/// let verbose = FieldType::optional(FieldType::Bool);
/// assert!(verbose.is_optional());
/// assert_eq!(verbose.to_string(), "Option<bool>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// `true` or `false`.
    Bool,
    /// An integer of the given kind.
    Int(IntKind),
    /// A floating-point number of the given kind.
    Float(FloatKind),
    /// UTF-8 text.
    String,
    /// A distinct type sharing the representation of `inner`.
    Named {
        /// Type name.
        name: String,
        /// Underlying representation.
        inner: Box<FieldType>,
    },
    /// A variable-length sequence.
    Seq(Box<FieldType>),
    /// A fixed-length array.
    Array {
        /// Element type.
        element: Box<FieldType>,
        /// Exact element count.
        len: usize,
    },
    /// A string-keyed mapping.
    Map(Box<FieldType>),
    /// A record with named members in declaration order.
    Record(Vec<RecordMember>),
    /// One indirection layer that may be absent.
    Ref(Box<FieldType>),
}

impl FieldType {
    /// Shorthand for `Int(IntKind::I8)`.
    pub const I8: Self = Self::Int(IntKind::I8);
    /// Shorthand for `Int(IntKind::I16)`.
    pub const I16: Self = Self::Int(IntKind::I16);
    /// Shorthand for `Int(IntKind::I32)`.
    pub const I32: Self = Self::Int(IntKind::I32);
    /// Shorthand for `Int(IntKind::I64)`.
    pub const I64: Self = Self::Int(IntKind::I64);
    /// Shorthand for `Int(IntKind::U8)`.
    pub const U8: Self = Self::Int(IntKind::U8);
    /// Shorthand for `Int(IntKind::U16)`.
    pub const U16: Self = Self::Int(IntKind::U16);
    /// Shorthand for `Int(IntKind::U32)`.
    pub const U32: Self = Self::Int(IntKind::U32);
    /// Shorthand for `Int(IntKind::U64)`.
    pub const U64: Self = Self::Int(IntKind::U64);
    /// Shorthand for `Float(FloatKind::F32)`.
    pub const F32: Self = Self::Float(FloatKind::F32);
    /// Shorthand for `Float(FloatKind::F64)`.
    pub const F64: Self = Self::Float(FloatKind::F64);

    /// Wraps `inner` in an indirection layer, making the field optional.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Ref(Box::new(inner))
    }

    /// Creates a named type over `inner`.
    #[must_use]
    pub fn named(name: impl Into<String>, inner: Self) -> Self {
        Self::Named {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    /// Creates a sequence type.
    #[must_use]
    pub fn seq(element: Self) -> Self {
        Self::Seq(Box::new(element))
    }

    /// Creates a fixed-length array type.
    #[must_use]
    pub fn array(element: Self, len: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            len,
        }
    }

    /// Creates a string-keyed map type.
    #[must_use]
    pub fn map(value: Self) -> Self {
        Self::Map(Box::new(value))
    }

    /// Creates a record type from `(name, type)` pairs.
    #[must_use]
    pub fn record<N: Into<String>>(members: impl IntoIterator<Item = (N, Self)>) -> Self {
        Self::Record(
            members
                .into_iter()
                .map(|(name, ty)| RecordMember::new(name, ty))
                .collect(),
        )
    }

    /// Returns `true` when the outermost layer is an indirection.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// Strips every indirection layer, returning the base type and the
    /// number of layers removed.
    #[must_use]
    pub fn peel_refs(&self) -> (&Self, usize) {
        let mut ty = self;
        let mut layers = 0;
        while let Self::Ref(inner) = ty {
            ty = inner;
            layers += 1;
        }
        (ty, layers)
    }

    /// Strips every name layer, returning the underlying representation.
    #[must_use]
    pub fn unnamed(&self) -> &Self {
        let mut ty = self;
        while let Self::Named { inner, .. } = ty {
            ty = inner;
        }
        ty
    }

    /// Returns `true` for sequences, arrays, maps and records, looking
    /// through names.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(
            self.unnamed(),
            Self::Seq(_) | Self::Array { .. } | Self::Map(_) | Self::Record(_)
        )
    }

    /// Returns `true` when `candidate` has exactly this type.
    ///
    /// No conversion is considered: an `i16` value is not admitted by an
    /// `i32` field, and a named value only by the same name.
    #[must_use]
    pub fn admits(&self, candidate: &Value) -> bool {
        match (self, candidate) {
            (Self::Ref(_), Value::Nil) => true,
            (Self::Ref(inner), Value::Ref(value)) => inner.admits(value),
            (Self::Named { name, inner }, Value::Named { name: got, value }) => {
                name == got && inner.admits(value)
            }
            (Self::Bool, Value::Bool(_)) | (Self::String, Value::Str(_)) => true,
            (Self::Int(kind), value) => value.int_kind() == Some(*kind),
            (Self::Float(kind), value) => value.float_kind() == Some(*kind),
            (Self::Seq(element), Value::Seq(items)) => items.iter().all(|item| element.admits(item)),
            (Self::Array { element, len }, Value::Array(items)) => {
                items.len() == *len && items.iter().all(|item| element.admits(item))
            }
            (Self::Map(element), Value::Map(entries)) => {
                entries.values().all(|item| element.admits(item))
            }
            (Self::Record(members), Value::Record(values)) => {
                members.len() == values.len()
                    && members
                        .iter()
                        .zip(values)
                        .all(|(member, (name, value))| {
                            member.name == *name && member.ty.admits(value)
                        })
            }
            _ => false,
        }
    }

    /// Returns the zero value of the type: `false`, `0`, empty text and
    /// containers, zeroed arrays and records, and an absent indirection.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Int(kind) => Value::zero_int(*kind),
            Self::Float(FloatKind::F32) => Value::F32(0.0),
            Self::Float(FloatKind::F64) => Value::F64(0.0),
            Self::String => Value::Str(String::new()),
            Self::Named { name, inner } => Value::Named {
                name: name.clone(),
                value: Box::new(inner.zero_value()),
            },
            Self::Seq(_) => Value::Seq(Vec::new()),
            Self::Array { element, len } => {
                Value::Array((0..*len).map(|_| element.zero_value()).collect())
            }
            Self::Map(_) => Value::Map(std::collections::BTreeMap::new()),
            Self::Record(members) => Value::Record(
                members
                    .iter()
                    .map(|member| (member.name.clone(), member.ty.zero_value()))
                    .collect(),
            ),
            Self::Ref(_) => Value::Nil,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int(kind) => f.write_str(kind.as_str()),
            Self::Float(kind) => f.write_str(kind.as_str()),
            Self::String => f.write_str("string"),
            Self::Named { name, .. } => f.write_str(name),
            Self::Seq(element) => write!(f, "[{element}]"),
            Self::Array { element, len } => write!(f, "[{element}; {len}]"),
            Self::Map(element) => write!(f, "map<string, {element}>"),
            Self::Record(members) => {
                f.write_str("{")?;
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", member.name, member.ty)?;
                }
                f.write_str("}")
            }
            Self::Ref(inner) => write!(f, "Option<{inner}>"),
        }
    }
}

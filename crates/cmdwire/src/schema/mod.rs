//! Command schemas and the type descriptors derived from them.
//!
//! A [`CommandSchema`] is what a command declares about itself: its fields
//! in wire order and any advisory defaults. [`TypeDescriptor::from_schema`]
//! checks the declaration once, at registration, and caches the parameter
//! bounds every later operation relies on.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CmdError, ErrorCode};
use crate::types::FieldType;
use crate::value::Value;

/// Whether a field can be read and written by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldAccess {
    /// The field is part of the command's public surface.
    #[default]
    Public,
    /// The field is internal to the command type.
    Private,
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    ty: FieldType,
    embedded: bool,
    access: FieldAccess,
}

impl FieldSpec {
    /// Declares a public, named field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
            access: FieldAccess::Public,
        }
    }

    /// Marks the field as an embedded (anonymous) member.
    #[must_use]
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Marks the field as inaccessible to the engine.
    #[must_use]
    pub const fn private(mut self) -> Self {
        self.access = FieldAccess::Private;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Returns `true` for embedded members.
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Returns the field's accessibility.
    #[must_use]
    pub const fn access(&self) -> FieldAccess {
        self.access
    }
}

/// The declared shape of a command.
///
/// # Example
///
/// ```
/// use cmdwire::schema::{CommandSchema, TypeDescriptor};
/// use cmdwire::types::FieldType;
///
/// let schema = CommandSchema::new()
///     .field("hash", FieldType::String)
///     .optional("verbose", FieldType::Bool)
///     .with_default("verbose", true);
/// let descriptor = TypeDescriptor::from_schema(&schema).expect("valid schema");
/// assert_eq!((descriptor.min_params(), descriptor.max_params()), (1, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSchema {
    fields: Vec<FieldSpec>,
    defaults: BTreeMap<String, Value>,
}

impl CommandSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field of type `ty`.
    #[must_use]
    pub fn field(self, name: impl Into<String>, ty: FieldType) -> Self {
        self.member(FieldSpec::new(name, ty))
    }

    /// Appends an optional field whose present values have type `inner`.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, inner: FieldType) -> Self {
        self.member(FieldSpec::new(name, FieldType::optional(inner)))
    }

    /// Appends a prepared field declaration.
    #[must_use]
    pub fn member(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declares the value an absent field is understood to take.
    ///
    /// The value must exactly match the optional field's inner type.
    #[must_use]
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Returns the declared fields in wire order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns the declared defaults keyed by field name.
    #[must_use]
    pub const fn defaults(&self) -> &BTreeMap<String, Value> {
        &self.defaults
    }
}

/// One validated field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    ty: FieldType,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Returns `true` when the field may be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.ty.is_optional()
    }

    /// Returns the declared default, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The validated, immutable description of a command type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    fields: Vec<FieldDescriptor>,
    min_params: usize,
    max_params: usize,
}

impl TypeDescriptor {
    /// Validates `schema` and derives its descriptor.
    ///
    /// # Errors
    ///
    /// Returns the schema error for the first offending field:
    /// [`ErrorCode::EmbeddedType`], [`ErrorCode::UnexportedField`],
    /// [`ErrorCode::DuplicateField`], [`ErrorCode::NonOptionalField`],
    /// [`ErrorCode::NonOptionalDefault`] or [`ErrorCode::MismatchedDefault`].
    /// A default naming no declared field fails with
    /// [`ErrorCode::UnusedDefault`].
    pub fn from_schema(schema: &CommandSchema) -> Result<Self, CmdError> {
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut seen = BTreeSet::new();
        let mut first_optional: Option<&str> = None;

        for (index, spec) in schema.fields().iter().enumerate() {
            let name = spec.name();
            let position = index + 1;
            if spec.is_embedded() {
                return Err(CmdError::new(
                    ErrorCode::EmbeddedType,
                    format!("embedded field #{position} '{name}' is not supported"),
                ));
            }
            if spec.access() == FieldAccess::Private {
                return Err(CmdError::new(
                    ErrorCode::UnexportedField,
                    format!("field #{position} '{name}' is not accessible"),
                ));
            }
            if !seen.insert(name) {
                return Err(CmdError::new(
                    ErrorCode::DuplicateField,
                    format!("field #{position} '{name}' is declared more than once"),
                ));
            }

            let ty = spec.ty();
            match (ty.is_optional(), first_optional) {
                (true, None) => first_optional = Some(name),
                (false, Some(optional)) => {
                    return Err(CmdError::new(
                        ErrorCode::NonOptionalField,
                        format!(
                            "required field #{position} '{name}' follows optional field '{optional}'"
                        ),
                    ));
                }
                _ => {}
            }

            let default = schema.defaults().get(name).cloned();
            if let Some(value) = &default {
                check_default(position, name, ty, value)?;
            }
            fields.push(FieldDescriptor {
                name: name.to_owned(),
                ty: ty.clone(),
                default,
            });
        }

        if let Some(unused) = schema.defaults().keys().find(|key| !seen.contains(key.as_str())) {
            return Err(CmdError::new(
                ErrorCode::UnusedDefault,
                format!("default for '{unused}' names no declared field"),
            ));
        }

        let min_params = fields.iter().filter(|field| !field.is_optional()).count();
        let max_params = fields.len();
        Ok(Self {
            fields,
            min_params,
            max_params,
        })
    }

    /// Returns the fields in wire order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the number of required fields.
    #[must_use]
    pub const fn min_params(&self) -> usize {
        self.min_params
    }

    /// Returns the total number of fields.
    #[must_use]
    pub const fn max_params(&self) -> usize {
        self.max_params
    }

    /// Checks a parameter count against the descriptor's bounds.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::NumParams`] error when `received` falls
    /// outside `min_params..=max_params`.
    pub fn check_num_params(&self, received: usize) -> Result<(), CmdError> {
        if (self.min_params..=self.max_params).contains(&received) {
            return Ok(());
        }
        let expected = if self.min_params == self.max_params {
            self.min_params.to_string()
        } else {
            format!("{} to {}", self.min_params, self.max_params)
        };
        Err(CmdError::new(
            ErrorCode::NumParams,
            format!("wrong number of params (expected {expected}, received {received})"),
        ))
    }
}

fn check_default(
    position: usize,
    name: &str,
    ty: &FieldType,
    value: &Value,
) -> Result<(), CmdError> {
    let FieldType::Ref(inner) = ty else {
        return Err(CmdError::new(
            ErrorCode::NonOptionalDefault,
            format!("required field #{position} '{name}' cannot declare a default"),
        ));
    };
    if inner.admits(value) {
        return Ok(());
    }
    Err(CmdError::new(
        ErrorCode::MismatchedDefault,
        format!(
            "default for field #{position} '{name}' must be type {inner} (got {})",
            value.type_name()
        ),
    ))
}

#[cfg(test)]
mod tests;

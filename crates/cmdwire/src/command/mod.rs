//! The trait implemented by every command record.
//!
//! Commands declare their shape through [`Command::schema`] instead of
//! being reflected over at run time. The registry validates that schema
//! once, and the constructor and unmarshaler hand the command a [`Fields`]
//! reader holding values already coerced to the declared types.

use std::any::Any;
use std::fmt;
use std::vec;

use crate::error::CmdError;
use crate::schema::CommandSchema;
use crate::value::{FromValue, Value};

/// A typed command record.
///
/// # Example
///
/// ```
/// use cmdwire::command::{Command, Fields};
/// use cmdwire::schema::CommandSchema;
/// use cmdwire::types::FieldType;
/// use cmdwire::value::Value;
/// use cmdwire::CmdError;
///
/// #[derive(Debug, PartialEq)]
/// struct GetBlockCount;
///
/// impl Command for GetBlockCount {
///     fn schema() -> CommandSchema {
///         CommandSchema::new()
///     }
///
///     fn from_fields(_fields: &mut Fields) -> Result<Self, CmdError> {
///         Ok(Self)
///     }
///
///     fn to_fields(&self) -> Vec<Value> {
///         Vec::new()
///     }
/// }
/// ```
pub trait Command: Any + fmt::Debug + Send + Sync {
    /// Declares the command's fields in wire order.
    fn schema() -> CommandSchema
    where
        Self: Sized;

    /// Builds the command from coerced field values.
    ///
    /// # Errors
    ///
    /// Returns an error when a slot does not hold the value the command
    /// expects, which indicates the schema and the record disagree.
    fn from_fields(fields: &mut Fields) -> Result<Self, CmdError>
    where
        Self: Sized;

    /// Returns the field values in wire order, with [`Value::Nil`] for
    /// absent optional fields.
    fn to_fields(&self) -> Vec<Value>;
}

/// Ordered reader over named field values.
///
/// Slots must be taken in declaration order, one at a time.
#[derive(Debug)]
pub struct Fields {
    slots: vec::IntoIter<(String, Value)>,
}

impl Fields {
    /// Creates a reader over `(name, value)` slots.
    #[must_use]
    pub fn new(slots: Vec<(String, Value)>) -> Self {
        Self {
            slots: slots.into_iter(),
        }
    }

    /// Creates a reader over the members of a record value.
    ///
    /// Nested record types use this from their [`FromValue`]
    /// implementation.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType)
    /// error when `value` is not a record.
    pub fn from_record(value: Value) -> Result<Self, CmdError> {
        match value {
            Value::Record(members) => Ok(Self::new(members)),
            other => Err(CmdError::invalid_type(format!(
                "expected a record value, got {}",
                other.type_name()
            ))),
        }
    }

    /// Takes the next slot, which must be named `name`, as a `T`.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType)
    /// error when the slots are exhausted, the next slot has another name, or
    /// its value is not a `T`.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, CmdError> {
        let Some((slot, value)) = self.slots.next() else {
            return Err(CmdError::invalid_type(format!("field '{name}' is missing")));
        };
        if slot != name {
            return Err(CmdError::invalid_type(format!(
                "expected field '{name}', found '{slot}'"
            )));
        }
        T::from_value(value)
            .map_err(|err| CmdError::invalid_type(format!("field '{name}': {}", err.message())))
    }

    /// Returns the number of slots not yet taken.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.slots.len()
    }
}

//! Building commands from loosely-typed positional arguments.

use std::any::Any;

use tracing::debug;

use crate::coerce::assign_field;
use crate::command::{Command, Fields};
use crate::error::CmdError;
use crate::registry::{CommandRegistry, RegistryEntry};
use crate::value::Value;

/// Tracing target for command construction.
const CONSTRUCT_TARGET: &str = "cmdwire::construct";

/// A constructed command together with the method it was built for.
#[derive(Debug)]
pub struct TaggedCommand {
    method: String,
    command: Box<dyn Command>,
}

impl TaggedCommand {
    pub(crate) fn new(method: &str, command: Box<dyn Command>) -> Self {
        Self {
            method: method.to_owned(),
            command,
        }
    }

    /// Returns the method name the command was built for.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the command as a trait object.
    #[must_use]
    pub fn command(&self) -> &dyn Command {
        self.command.as_ref()
    }

    /// Returns the command as a `C`, if that is its type.
    #[must_use]
    pub fn downcast_ref<C: Command>(&self) -> Option<&C> {
        let any: &dyn Any = self.command.as_ref();
        any.downcast_ref::<C>()
    }

    /// Consumes the tag and returns the boxed command.
    #[must_use]
    pub fn into_inner(self) -> Box<dyn Command> {
        self.command
    }
}

impl CommandRegistry {
    /// Builds the command registered as `method` from positional `args`.
    ///
    /// Each argument is coerced into its field's declared type; fields past
    /// the last argument stay absent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnregisteredMethod`](crate::ErrorCode::UnregisteredMethod)
    /// for an unknown method, [`ErrorCode::NumParams`](crate::ErrorCode::NumParams)
    /// when the argument count is out of bounds, and
    /// [`ErrorCode::InvalidType`](crate::ErrorCode::InvalidType) for the first
    /// argument that cannot be coerced.
    ///
    /// # Example
    ///
    /// ```
    /// use cmdwire::command::{Command, Fields};
    /// use cmdwire::registry::{RegistryBuilder, UsageFlags};
    /// use cmdwire::schema::CommandSchema;
    /// use cmdwire::types::FieldType;
    /// use cmdwire::value::Value;
    /// use cmdwire::CmdError;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct GetBlock {
    ///     height: i32,
    ///     verbose: Option<bool>,
    /// }
    ///
    /// impl Command for GetBlock {
    ///     fn schema() -> CommandSchema {
    ///         CommandSchema::new()
    ///             .field("height", FieldType::I32)
    ///             .optional("verbose", FieldType::Bool)
    ///     }
    ///
    ///     fn from_fields(fields: &mut Fields) -> Result<Self, CmdError> {
    ///         Ok(Self {
    ///             height: fields.take("height")?,
    ///             verbose: fields.take("verbose")?,
    ///         })
    ///     }
    ///
    ///     fn to_fields(&self) -> Vec<Value> {
    ///         vec![self.height.into(), self.verbose.into()]
    ///     }
    /// }
    ///
    /// let mut builder = RegistryBuilder::new();
    /// builder.register::<GetBlock>("getblock", UsageFlags::empty()).expect("valid");
    /// let registry = builder.seal();
    ///
    /// let cmd = registry.new_cmd("getblock", [Value::from("5")]).expect("coerces");
    /// let block = cmd.downcast_ref::<GetBlock>().expect("GetBlock");
    /// assert_eq!(block, &GetBlock { height: 5, verbose: None });
    /// ```
    pub fn new_cmd(
        &self,
        method: &str,
        args: impl IntoIterator<Item = Value>,
    ) -> Result<TaggedCommand, CmdError> {
        let entry = self.lookup(method)?;
        let values: Vec<Value> = args.into_iter().collect();
        entry.descriptor().check_num_params(values.len())?;

        let fields = values
            .into_iter()
            .enumerate()
            .zip(entry.descriptor().fields())
            .map(|((index, arg), field)| {
                assign_field(index, field.name(), field.ty(), arg)
                    .map(|value| (field.name().to_owned(), value))
            })
            .collect::<Result<Vec<_>, CmdError>>()
            .inspect_err(|err| {
                debug!(target: CONSTRUCT_TARGET, method, error = %err, "argument rejected");
            })?;
        build_tagged(entry, fields)
    }
}

/// Pads `fields` with absent values and builds the entry's command.
pub(crate) fn build_tagged(
    entry: &RegistryEntry,
    mut fields: Vec<(String, Value)>,
) -> Result<TaggedCommand, CmdError> {
    let supplied = fields.len();
    fields.extend(
        entry
            .descriptor()
            .fields()
            .iter()
            .skip(supplied)
            .map(|field| (field.name().to_owned(), Value::Nil)),
    );
    let command = entry.build(&mut Fields::new(fields))?;
    Ok(TaggedCommand::new(entry.method(), command))
}

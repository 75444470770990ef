//! Typed command schemas for JSON-RPC 1.0 style requests.
//!
//! The `cmdwire` crate lets a program describe a family of remote-procedure
//! commands as typed records, then build a command from loosely-typed
//! positional arguments, marshal it into a request envelope, and turn an
//! incoming envelope back into a concrete, type-checked command, all without
//! per-command codec code.
//!
//! # Architecture
//!
//! Each command type implements [`Command`], declaring its fields through a
//! [`CommandSchema`]. A [`RegistryBuilder`] validates every schema when the
//! command is registered, so a malformed record is rejected at start-up
//! rather than while handling a request. Sealing the builder yields an
//! immutable [`CommandRegistry`] that can be shared freely between threads.
//!
//! The registry drives three operations:
//!
//! - [`CommandRegistry::new_cmd`] binds positional [`Value`]s to fields;
//! - [`CommandRegistry::marshal_cmd`] writes a [`Request`] envelope;
//! - [`CommandRegistry::unmarshal_cmd`] reads one back.
//!
//! Every field value passes through the coercion engine in [`coerce`],
//! which converts between representations only when no information is lost.
//!
//! # Example
//!
//! ```
//! use cmdwire::{Command, CommandSchema, CmdError, Fields, FieldType, RegistryBuilder, UsageFlags, Value};
//! use serde_json::json;
//!
//! #[derive(Debug, PartialEq)]
//! struct GetBlock {
//!     height: i32,
//!     verbose: Option<bool>,
//! }
//!
//! impl Command for GetBlock {
//!     fn schema() -> CommandSchema {
//!         CommandSchema::new()
//!             .field("height", FieldType::I32)
//!             .optional("verbose", FieldType::Bool)
//!     }
//!
//!     fn from_fields(fields: &mut Fields) -> Result<Self, CmdError> {
//!         Ok(Self {
//!             height: fields.take("height")?,
//!             verbose: fields.take("verbose")?,
//!         })
//!     }
//!
//!     fn to_fields(&self) -> Vec<Value> {
//!         vec![self.height.into(), self.verbose.into()]
//!     }
//! }
//!
//! let mut builder = RegistryBuilder::new();
//! builder.register::<GetBlock>("getblock", UsageFlags::empty()).expect("valid schema");
//! let registry = builder.seal();
//!
//! let cmd = registry.new_cmd("getblock", [Value::I32(5)]).expect("constructs");
//! let bytes = registry.marshal_cmd(&json!(1), cmd.command()).expect("marshals");
//! let decoded = registry.unmarshal_slice(&bytes).expect("unmarshals");
//! assert_eq!(decoded.downcast_ref::<GetBlock>(), cmd.downcast_ref::<GetBlock>());
//! ```

pub mod codec;
pub mod coerce;
pub mod command;
pub mod construct;
pub mod decode;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod telemetry;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use self::codec::marshal_response;
pub use self::command::{Command, Fields};
pub use self::construct::TaggedCommand;
pub use self::error::{CmdError, ErrorCode};
pub use self::protocol::{Request, Response, RpcError, is_valid_id};
pub use self::registry::{
    CommandRegistry, RegistryBuilder, RegistryEntry, UsageFlags, global, install_global,
};
pub use self::schema::{CommandSchema, FieldDescriptor, FieldSpec, TypeDescriptor};
pub use self::types::FieldType;
pub use self::value::{FromValue, Value};

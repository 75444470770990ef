//! Marshaling commands to request envelopes and back.
//!
//! Parameters are written in field declaration order. Trailing absent
//! optional fields are omitted rather than sent as `null`, so peers that
//! expect fewer parameters keep working.

use std::any::{Any, TypeId};

use serde::Serialize;
use serde_json::Value as Json;
use tracing::debug;

use crate::coerce::assign_field;
use crate::command::Command;
use crate::construct::{TaggedCommand, build_tagged};
use crate::decode::decode_param;
use crate::error::{CmdError, ErrorCode};
use crate::protocol::{Request, Response, RpcError, check_id};
use crate::registry::{CommandRegistry, RegistryEntry};
use crate::value::Value;

/// Tracing target for marshaling operations.
const CODEC_TARGET: &str = "cmdwire::codec";

impl CommandRegistry {
    /// Builds the request envelope for `command`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidType`] for an invalid `id`, a field value
    /// that does not match its declared type, or an absent optional field
    /// followed by a present one; and [`ErrorCode::UnregisteredMethod`] when
    /// the command's type is not registered.
    pub fn build_request(&self, id: &Json, command: &dyn Command) -> Result<Request, CmdError> {
        check_id(id)?;
        let any: &dyn Any = command;
        let entry = self.lookup_type(any.type_id()).ok_or_else(|| {
            CmdError::new(
                ErrorCode::UnregisteredMethod,
                format!("command type {command:?} is not registered"),
            )
        })?;
        let params = encode_params(entry, command.to_fields())?;
        debug!(
            target: CODEC_TARGET,
            method = entry.method(),
            params = params.len(),
            "built request"
        );
        Request::new(self.jsonrpc_version(), id.clone(), entry.method(), params)
    }

    /// Serialises the request envelope for `command`.
    ///
    /// # Errors
    ///
    /// As [`CommandRegistry::build_request`].
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
    /// use serde_json::json;
    ///
    /// #[derive(Debug)]
    /// struct GetBlock {
    ///     hash: String,
    ///     verbose: Option<bool>,
    /// }
    ///
    /// impl Command for GetBlock {
    ///     fn schema() -> CommandSchema {
    ///         CommandSchema::new()
    ///             .field("hash", FieldType::String)
    ///             .optional("verbose", FieldType::Bool)
    ///     }
    ///
    ///     fn from_fields(fields: &mut Fields) -> Result<Self, CmdError> {
    ///         Ok(Self {
    ///             hash: fields.take("hash")?,
    ///             verbose: fields.take("verbose")?,
    ///         })
    ///     }
    ///
    ///     fn to_fields(&self) -> Vec<Value> {
    ///         vec![self.hash.clone().into(), self.verbose.into()]
    ///     }
    /// }
    ///
    /// let mut builder = RegistryBuilder::new();
    /// builder.register::<GetBlock>("getblock", UsageFlags::empty()).expect("valid");
    /// let registry = builder.seal();
    ///
    /// let cmd = GetBlock { hash: "00ab".into(), verbose: None };
    /// let bytes = registry.marshal_cmd(&json!(1), &cmd).expect("marshals");
    /// assert_eq!(
    ///     String::from_utf8(bytes).expect("utf-8"),
    ///     r#"{"jsonrpc":"1.0","method":"getblock","params":["00ab"],"id":1}"#
    /// );
    /// ```
    pub fn marshal_cmd(&self, id: &Json, command: &dyn Command) -> Result<Vec<u8>, CmdError> {
        let request = self.build_request(id, command)?;
        to_bytes(&request)
    }

    /// Serialises the request envelope for a possibly missing command of
    /// type `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidType`] for an invalid `id` or a missing
    /// command of a registered type, [`ErrorCode::UnregisteredMethod`] when
    /// `C` is not registered, and otherwise as
    /// [`CommandRegistry::build_request`].
    pub fn marshal_nullable<C: Command>(
        &self,
        id: &Json,
        command: Option<&C>,
    ) -> Result<Vec<u8>, CmdError> {
        check_id(id)?;
        let entry = self.lookup_type(TypeId::of::<C>()).ok_or_else(|| {
            CmdError::new(
                ErrorCode::UnregisteredMethod,
                format!("command type {} is not registered", std::any::type_name::<C>()),
            )
        })?;
        let Some(present) = command else {
            return Err(CmdError::invalid_type(format!(
                "a command for method '{}' is required, got none",
                entry.method()
            )));
        };
        self.marshal_cmd(id, present)
    }

    /// Rebuilds the command carried by `request`.
    ///
    /// Each parameter is decoded generically and then coerced into its
    /// field; fields without a parameter stay absent.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnregisteredMethod`] for an unknown method,
    /// [`ErrorCode::NumParams`] when the parameter count is out of bounds,
    /// and [`ErrorCode::InvalidType`] for the first parameter that cannot be
    /// decoded or coerced.
    pub fn unmarshal_cmd(&self, request: &Request) -> Result<TaggedCommand, CmdError> {
        let method = request.method();
        let entry = self.lookup(method)?;
        entry.descriptor().check_num_params(request.params().len())?;

        let fields = request
            .params()
            .iter()
            .zip(entry.descriptor().fields())
            .enumerate()
            .map(|(index, (param, field))| {
                let decoded = decode_param(param, field.ty()).map_err(|reason| {
                    CmdError::invalid_type(format!(
                        "parameter #{} '{}' {reason}",
                        index + 1,
                        field.name()
                    ))
                })?;
                assign_field(index, field.name(), field.ty(), decoded)
                    .map(|value| (field.name().to_owned(), value))
            })
            .collect::<Result<Vec<_>, CmdError>>()
            .inspect_err(|err| {
                debug!(target: CODEC_TARGET, method, error = %err, "parameter rejected");
            })?;
        build_tagged(entry, fields)
    }

    /// Parses request bytes and rebuilds the command they carry.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidType`] for malformed bytes, and otherwise
    /// as [`CommandRegistry::unmarshal_cmd`].
    pub fn unmarshal_slice(&self, bytes: &[u8]) -> Result<TaggedCommand, CmdError> {
        let request: Request = serde_json::from_slice(bytes)
            .map_err(|err| CmdError::invalid_type(format!("malformed request: {err}")))?;
        self.unmarshal_cmd(&request)
    }
}

/// Serialises a response envelope.
///
/// # Errors
///
/// Returns [`ErrorCode::InvalidType`] for an invalid `id` or a result that
/// cannot be represented as JSON.
///
/// # Example
///
/// ```
/// use cmdwire::codec::marshal_response;
/// use serde_json::json;
///
/// let bytes = marshal_response(&json!(1), &json!(42), None).expect("marshals");
/// assert_eq!(bytes, br#"{"result":42,"error":null,"id":1}"#);
/// ```
pub fn marshal_response<T: Serialize + ?Sized>(
    id: &Json,
    result: &T,
    error: Option<RpcError>,
) -> Result<Vec<u8>, CmdError> {
    let document = serde_json::to_value(result)
        .map_err(|err| CmdError::invalid_type(format!("result cannot be encoded: {err}")))?;
    let response = Response::new(id.clone(), document, error)?;
    to_bytes(&response)
}

fn encode_params(entry: &RegistryEntry, values: Vec<Value>) -> Result<Vec<Json>, CmdError> {
    let fields = entry.descriptor().fields();
    if values.len() != fields.len() {
        return Err(CmdError::invalid_type(format!(
            "method '{}' declares {} fields but the command supplied {}",
            entry.method(),
            fields.len(),
            values.len()
        )));
    }

    let present = values.iter().rposition(|value| !value.is_nil()).map_or(0, |last| last + 1);
    let mut params = Vec::with_capacity(present);
    for (index, (value, field)) in values.iter().zip(fields).take(present).enumerate() {
        if !field.ty().admits(value) {
            return Err(CmdError::invalid_type(format!(
                "parameter #{} '{}' must be type {} (got {})",
                index + 1,
                field.name(),
                field.ty(),
                value.type_name()
            )));
        }
        if value.is_nil() {
            return Err(CmdError::invalid_type(format!(
                "parameter #{} '{}' is absent but a later optional field is present",
                index + 1,
                field.name()
            )));
        }
        params.push(value.to_json()?);
    }
    Ok(params)
}

fn to_bytes<T: Serialize>(envelope: &T) -> Result<Vec<u8>, CmdError> {
    serde_json::to_vec(envelope)
        .map_err(|err| CmdError::invalid_type(format!("envelope cannot be encoded: {err}")))
}

//! JSON-RPC 1.0 envelope types.
//!
//! A [`Request`] carries a method name, its positional parameters in field
//! declaration order, and a caller-chosen id. A [`Response`] carries either
//! a result or an [`RpcError`] for the request with the same id.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as Json;
use thiserror::Error;

use crate::error::{CmdError, ErrorCode};

/// Standard JSON-RPC error codes.
pub mod error_codes {
    /// The request bytes are not valid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// The document is not a valid request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// The parameters do not fit the method.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Any other failure inside the server.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Returns `true` when `id` may identify a request: `null`, a number or a
/// string.
#[must_use]
pub const fn is_valid_id(id: &Json) -> bool {
    matches!(id, Json::Null | Json::Number(_) | Json::String(_))
}

pub(crate) fn check_id(id: &Json) -> Result<(), CmdError> {
    if is_valid_id(id) {
        return Ok(());
    }
    Err(CmdError::invalid_type(format!(
        "the id of type {} is invalid; it must be null, a number or a string",
        json_kind(id)
    )))
}

const fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// A request envelope.
///
/// # Example
///
/// ```
/// use cmdwire::protocol::Request;
/// use serde_json::json;
///
/// let request = Request::new("1.0", json!(1), "getblockcount", Vec::new()).expect("valid id");
/// let text = serde_json::to_string(&request).expect("serialise");
/// assert_eq!(text, r#"{"jsonrpc":"1.0","method":"getblockcount","params":[],"id":1}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    jsonrpc: String,
    method: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    params: Vec<Json>,
    #[serde(default)]
    id: Json,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Json>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Json>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Request {
    /// Creates a request envelope.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`] error when `id` is not `null`,
    /// a number or a string.
    pub fn new(
        jsonrpc: impl Into<String>,
        id: Json,
        method: impl Into<String>,
        params: Vec<Json>,
    ) -> Result<Self, CmdError> {
        check_id(&id)?;
        Ok(Self {
            jsonrpc: jsonrpc.into(),
            method: method.into(),
            params,
            id,
        })
    }

    /// Returns the protocol version.
    #[must_use]
    pub const fn jsonrpc(&self) -> &str {
        self.jsonrpc.as_str()
    }

    /// Returns the method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the positional parameters.
    #[must_use]
    pub fn params(&self) -> &[Json] {
        &self.params
    }

    /// Returns the request id.
    #[must_use]
    pub const fn id(&self) -> &Json {
        &self.id
    }
}

/// An error object carried by a [`Response`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    /// Numeric error code; see [`error_codes`].
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl RpcError {
    /// Creates an error object.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&CmdError> for RpcError {
    fn from(err: &CmdError) -> Self {
        let code = match err.code() {
            ErrorCode::UnregisteredMethod => error_codes::METHOD_NOT_FOUND,
            ErrorCode::NumParams | ErrorCode::InvalidType => error_codes::INVALID_PARAMS,
            _ => error_codes::INTERNAL_ERROR,
        };
        Self::new(code, err.message())
    }
}

impl From<CmdError> for RpcError {
    fn from(err: CmdError) -> Self {
        Self::from(&err)
    }
}

/// A response envelope.
///
/// `result`, `error` and `id` are always present on the wire, as `null`
/// when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    result: Json,
    #[serde(default)]
    error: Option<RpcError>,
    #[serde(default)]
    id: Json,
}

impl Response {
    /// Creates a response envelope.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidType`] error when `id` is not `null`,
    /// a number or a string.
    pub fn new(id: Json, result: Json, error: Option<RpcError>) -> Result<Self, CmdError> {
        check_id(&id)?;
        Ok(Self { result, error, id })
    }

    /// Returns the result document, `null` on failure.
    #[must_use]
    pub const fn result(&self) -> &Json {
        &self.result
    }

    /// Returns the error object, if the request failed.
    #[must_use]
    pub const fn error(&self) -> Option<&RpcError> {
        self.error.as_ref()
    }

    /// Returns the id of the request being answered.
    #[must_use]
    pub const fn id(&self) -> &Json {
        &self.id
    }
}

#[cfg(test)]
mod tests;

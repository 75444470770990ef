//! Error taxonomy for schema registration and command coding.
//!
//! Every failure carries an [`ErrorCode`] so callers can branch on the kind
//! of failure without parsing the message. Schema errors are raised only by
//! registration; value errors are the expected outcome of bad caller or peer
//! input and are always returned, never raised as panics.

use std::fmt;

use thiserror::Error;

/// Identifies the kind of a [`CmdError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A method name (or command type) was registered more than once.
    DuplicateMethod,
    /// A schema declares two fields with the same name.
    DuplicateField,
    /// The method or command type is not present in the registry.
    UnregisteredMethod,
    /// The number of supplied parameters is outside the accepted range.
    NumParams,
    /// A value cannot be converted to, or does not match, the expected type.
    InvalidType,
    /// A schema contains an embedded (anonymous) member.
    EmbeddedType,
    /// A schema contains a member the codec may not access.
    UnexportedField,
    /// A default value names a field the schema does not declare.
    UnusedDefault,
    /// A required field follows an optional field.
    NonOptionalField,
    /// A default value is attached to a required field.
    NonOptionalDefault,
    /// A default value's type differs from its field's type.
    MismatchedDefault,
}

impl ErrorCode {
    /// Returns the stable name of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateMethod => "ErrDuplicateMethod",
            Self::DuplicateField => "ErrDuplicateField",
            Self::UnregisteredMethod => "ErrUnregisteredMethod",
            Self::NumParams => "ErrNumParams",
            Self::InvalidType => "ErrInvalidType",
            Self::EmbeddedType => "ErrEmbeddedType",
            Self::UnexportedField => "ErrUnexportedField",
            Self::UnusedDefault => "ErrUnusedDefault",
            Self::NonOptionalField => "ErrNonOptionalField",
            Self::NonOptionalDefault => "ErrNonOptionalDefault",
            Self::MismatchedDefault => "ErrMismatchedDefault",
        }
    }

    /// Returns `true` for codes that only registration can produce.
    #[must_use]
    pub const fn is_schema_error(self) -> bool {
        matches!(
            self,
            Self::DuplicateMethod
                | Self::DuplicateField
                | Self::EmbeddedType
                | Self::UnexportedField
                | Self::UnusedDefault
                | Self::NonOptionalField
                | Self::NonOptionalDefault
                | Self::MismatchedDefault
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every fallible operation in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct CmdError {
    code: ErrorCode,
    message: String,
}

impl CmdError {
    /// Creates an error with the given code and description.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates an [`ErrorCode::InvalidType`] error.
    #[must_use]
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidType, message)
    }

    /// Creates an [`ErrorCode::UnregisteredMethod`] error for `method`.
    #[must_use]
    pub fn unregistered(method: &str) -> Self {
        Self::new(
            ErrorCode::UnregisteredMethod,
            format!("method '{method}' is not registered"),
        )
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the human-readable description.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[cfg(test)]
mod tests;

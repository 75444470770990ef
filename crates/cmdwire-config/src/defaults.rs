//! Default values shared by configuration deserialisation and `Default`.

use crate::logging::LogFormat;

/// Protocol version string written into every request envelope.
pub const DEFAULT_JSONRPC_VERSION: &str = "1.0";

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned protocol version used where allocation is required (e.g. serde).
#[must_use]
pub fn default_jsonrpc_version() -> String {
    DEFAULT_JSONRPC_VERSION.to_owned()
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

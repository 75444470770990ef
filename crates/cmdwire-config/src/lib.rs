//! Shared configuration for the `cmdwire` command codec.
//!
//! Configuration is a small TOML document. Every key is optional; missing
//! keys fall back to the values in [`defaults`].
//!
//! ```toml
//! jsonrpc_version = "1.0"
//! log_filter = "cmdwire=debug"
//! log_format = "compact"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod defaults;
pub mod logging;

pub use self::defaults::{DEFAULT_JSONRPC_VERSION, DEFAULT_LOG_FILTER};
pub use self::logging::{LogFormat, LogFormatParseError};

use self::defaults::{default_jsonrpc_version, default_log_filter_string, default_log_format};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file '{}': {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid TOML or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not usable.
    #[error("invalid configuration value for '{key}': {message}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_jsonrpc_version")]
    jsonrpc_version: String,
    #[serde(default = "default_log_filter_string")]
    log_filter: String,
    #[serde(default = "default_log_format")]
    log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jsonrpc_version: default_jsonrpc_version(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] when the protocol version is blank.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the errors of [`Config::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Overrides the protocol version.
    #[must_use]
    pub fn with_jsonrpc_version(mut self, version: impl Into<String>) -> Self {
        self.jsonrpc_version = version.into();
        self
    }

    /// Overrides the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Overrides the log format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jsonrpc_version.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "jsonrpc_version",
                message: String::from("must not be empty"),
            });
        }
        Ok(())
    }

    /// Protocol version written into request envelopes.
    #[must_use]
    pub const fn jsonrpc_version(&self) -> &str {
        self.jsonrpc_version.as_str()
    }

    /// Log filter expression in `tracing-subscriber` `EnvFilter` syntax.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

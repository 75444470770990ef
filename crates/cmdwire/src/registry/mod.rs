//! Method registry with a two-phase lifecycle.
//!
//! Commands are registered on a mutable [`RegistryBuilder`] during start-up.
//! Each registration validates the command's schema completely, so schema
//! errors never surface while handling requests. [`RegistryBuilder::seal`]
//! then freezes the table into a [`CommandRegistry`], which is immutable
//! and can be shared between threads without locking.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use cmdwire_config::Config;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::command::{Command, Fields};
use crate::error::{CmdError, ErrorCode};
use crate::schema::TypeDescriptor;

mod flags;
mod usage;

pub use self::flags::UsageFlags;

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = "cmdwire::registry";

/// Builds a boxed command from coerced field values.
pub(crate) type BuildFn = fn(&mut Fields) -> Result<Box<dyn Command>, CmdError>;

fn build_boxed<C: Command>(fields: &mut Fields) -> Result<Box<dyn Command>, CmdError> {
    C::from_fields(fields).map(|command| Box::new(command) as Box<dyn Command>)
}

/// Everything the registry knows about one method.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    method: String,
    descriptor: TypeDescriptor,
    flags: UsageFlags,
    usage: String,
    build: BuildFn,
}

impl RegistryEntry {
    /// Returns the method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the validated type descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Returns the usage flags.
    #[must_use]
    pub const fn flags(&self) -> UsageFlags {
        self.flags
    }

    /// Returns the one-line usage text.
    #[must_use]
    pub const fn usage(&self) -> &str {
        self.usage.as_str()
    }

    pub(crate) fn build(&self, fields: &mut Fields) -> Result<Box<dyn Command>, CmdError> {
        (self.build)(fields)
    }
}

/// Mutable registration phase.
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
/// #[derive(Debug)]
/// struct GetBlockHash {
///     index: i64,
/// }
///
/// impl Command for GetBlockHash {
///     fn schema() -> CommandSchema {
///         CommandSchema::new().field("index", FieldType::I64)
///     }
///
///     fn from_fields(fields: &mut Fields) -> Result<Self, CmdError> {
///         Ok(Self { index: fields.take("index")? })
///     }
///
///     fn to_fields(&self) -> Vec<Value> {
///         vec![self.index.into()]
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// builder
///     .register::<GetBlockHash>("getblockhash", UsageFlags::empty())
///     .expect("valid command");
/// let registry = builder.seal();
/// assert_eq!(registry.method_usage_text("getblockhash").expect("registered"), "getblockhash index");
/// ```
#[derive(Debug)]
pub struct RegistryBuilder {
    entries: HashMap<String, RegistryEntry>,
    methods_by_type: HashMap<TypeId, String>,
    jsonrpc_version: String,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RegistryBuilder {
    /// Creates an empty builder with the default protocol version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder using the protocol version from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            entries: HashMap::new(),
            methods_by_type: HashMap::new(),
            jsonrpc_version: config.jsonrpc_version().to_owned(),
        }
    }

    /// Registers command type `C` under `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::DuplicateMethod`] when `method` or `C` is
    /// already registered, or the schema error found by
    /// [`TypeDescriptor::from_schema`].
    pub fn register<C: Command>(&mut self, method: &str, flags: UsageFlags) -> Result<(), CmdError> {
        let result = self.try_register::<C>(method, flags);
        match &result {
            Ok(()) => debug!(
                target: REGISTRY_TARGET,
                method,
                flags = %flags,
                "registered command"
            ),
            Err(err) => debug!(
                target: REGISTRY_TARGET,
                method,
                code = %err.code(),
                error = %err,
                "command registration rejected"
            ),
        }
        result
    }

    fn try_register<C: Command>(&mut self, method: &str, flags: UsageFlags) -> Result<(), CmdError> {
        if self.entries.contains_key(method) {
            return Err(CmdError::new(
                ErrorCode::DuplicateMethod,
                format!("method '{method}' is already registered"),
            ));
        }
        let type_id = TypeId::of::<C>();
        if let Some(existing) = self.methods_by_type.get(&type_id) {
            return Err(CmdError::new(
                ErrorCode::DuplicateMethod,
                format!("command type is already registered as method '{existing}'"),
            ));
        }

        let descriptor = TypeDescriptor::from_schema(&C::schema())?;
        let usage = usage::method_usage(method, &descriptor);
        self.methods_by_type.insert(type_id, method.to_owned());
        self.entries.insert(
            method.to_owned(),
            RegistryEntry {
                method: method.to_owned(),
                descriptor,
                flags,
                usage,
                build: build_boxed::<C>,
            },
        );
        Ok(())
    }

    /// Freezes the table.
    #[must_use]
    pub fn seal(self) -> CommandRegistry {
        debug!(
            target: REGISTRY_TARGET,
            methods = self.entries.len(),
            "registry sealed"
        );
        CommandRegistry {
            entries: self.entries,
            methods_by_type: self.methods_by_type,
            jsonrpc_version: self.jsonrpc_version,
        }
    }
}

/// Immutable, shareable method table.
#[derive(Debug)]
pub struct CommandRegistry {
    entries: HashMap<String, RegistryEntry>,
    methods_by_type: HashMap<TypeId, String>,
    jsonrpc_version: String,
}

impl CommandRegistry {
    /// Looks up the entry for `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnregisteredMethod`] when no such method exists.
    pub fn lookup(&self, method: &str) -> Result<&RegistryEntry, CmdError> {
        self.entries.get(method).ok_or_else(|| {
            debug!(target: REGISTRY_TARGET, method, "lookup of unregistered method");
            CmdError::unregistered(method)
        })
    }

    pub(crate) fn lookup_type(&self, type_id: TypeId) -> Option<&RegistryEntry> {
        self.methods_by_type
            .get(&type_id)
            .and_then(|method| self.entries.get(method))
    }

    /// Returns every registered method name in ascending order.
    #[must_use]
    pub fn registered_methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Returns the usage flags of `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnregisteredMethod`] when no such method exists.
    pub fn method_usage_flags(&self, method: &str) -> Result<UsageFlags, CmdError> {
        self.lookup(method).map(RegistryEntry::flags)
    }

    /// Returns the one-line usage text of `method`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnregisteredMethod`] when no such method exists.
    pub fn method_usage_text(&self, method: &str) -> Result<&str, CmdError> {
        self.lookup(method).map(RegistryEntry::usage)
    }

    /// Returns the method under which the type of `command` is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnregisteredMethod`] when the command's type is
    /// not registered.
    pub fn cmd_method(&self, command: &dyn Command) -> Result<&str, CmdError> {
        let any: &dyn Any = command;
        self.lookup_type(any.type_id())
            .map(RegistryEntry::method)
            .ok_or_else(|| {
                CmdError::new(
                    ErrorCode::UnregisteredMethod,
                    format!("command type {command:?} is not registered"),
                )
            })
    }

    /// Returns the protocol version written into request envelopes.
    #[must_use]
    pub const fn jsonrpc_version(&self) -> &str {
        self.jsonrpc_version.as_str()
    }

    /// Returns the number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no methods are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static GLOBAL: OnceCell<CommandRegistry> = OnceCell::new();

/// Installs `registry` as the process-wide registry.
///
/// The first installation wins and stays for the life of the process.
///
/// # Errors
///
/// Hands `registry` back when a registry is already installed.
pub fn install_global(registry: CommandRegistry) -> Result<&'static CommandRegistry, CommandRegistry> {
    GLOBAL.try_insert(registry).map_err(|(_, rejected)| rejected)
}

/// Returns the process-wide registry, if one has been installed.
#[must_use]
pub fn global() -> Option<&'static CommandRegistry> {
    GLOBAL.get()
}

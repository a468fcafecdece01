// Unilog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Unilog operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum UnilogError {
    /// Configuration validation failed at construction time.
    Config(ConfigError),

    /// Command registration failed.
    Command(CommandError),

    /// Command invocation failed.
    Invoke(InvokeError),

    /// A sink write failed.
    Sink(SinkError),

    /// The GUI event loop could not be started.
    Gui {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for UnilogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Command(e) => write!(f, "Command error: {e}"),
            Self::Invoke(e) => write!(f, "Invocation error: {e}"),
            Self::Sink(e) => write!(f, "Sink error: {e}"),
            Self::Gui { source } => write!(f, "Failed to launch GUI: {source}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for UnilogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Command(e) => Some(e),
            Self::Invoke(e) => Some(e),
            Self::Sink(e) => Some(e),
            Self::Gui { source } => Some(source.as_ref()),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors detected while validating facade configuration. All of these are
/// fatal at setup: a facade is never constructed with a bad configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The level name is not one of DEBUG/INFO/WARNING/ERROR/CRITICAL.
    InvalidLevel { value: String },

    /// An interface token is not "cli" or "gui".
    InvalidInterface { value: String },

    /// The log folder could not be created.
    LogFolder { path: PathBuf, source: io::Error },

    /// A file sink target could not be opened for appending.
    SinkTarget { path: PathBuf, source: io::Error },

    /// config.toml could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// I/O error reading the config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { value } => write!(
                f,
                "Invalid log level '{value}'. \
                 Expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL."
            ),
            Self::InvalidInterface { value } => write!(
                f,
                "Invalid interface '{value}'. Expected \"cli\", \"gui\", or \"cli,gui\"."
            ),
            Self::LogFolder { path, source } => write!(
                f,
                "Cannot create log folder '{}': {source}",
                path.display()
            ),
            Self::SinkTarget { path, source } => write!(
                f,
                "Cannot open log file '{}' for appending: {source}",
                path.display()
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::LogFolder { source, .. } => Some(source),
            Self::SinkTarget { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for UnilogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Command registration errors
// ---------------------------------------------------------------------------

/// Errors raised while registering CLI commands.
#[derive(Debug)]
pub enum CommandError {
    /// A command with this name is already registered.
    Duplicate { name: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { name } => {
                write!(f, "Command '{name}' is already registered")
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for UnilogError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Command invocation errors
// ---------------------------------------------------------------------------

/// Errors raised while invoking a registered command.
///
/// `Handler` carries the callable's own runtime error unmodified; the
/// registry never swallows or rewraps what a command raised.
#[derive(Debug)]
pub enum InvokeError {
    /// No command with this name is registered.
    Unknown { name: String },

    /// The supplied arguments do not match the command's parameter list.
    InvalidArguments { command: String, reason: String },

    /// The command's own handler failed.
    Handler {
        command: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "Unknown command '{name}'"),
            Self::InvalidArguments { command, reason } => {
                write!(f, "Invalid arguments for '{command}': {reason}")
            }
            Self::Handler { command, source } => {
                write!(f, "Command '{command}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for InvokeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handler { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<InvokeError> for UnilogError {
    fn from(e: InvokeError) -> Self {
        Self::Invoke(e)
    }
}

// ---------------------------------------------------------------------------
// Sink errors
// ---------------------------------------------------------------------------

/// Errors raised while emitting to sinks.
#[derive(Debug)]
pub enum SinkError {
    /// Writing a record to a sink failed. Fatal only when the failing sink
    /// is the primary one; secondary sinks are disabled instead.
    Write { sink: String, source: io::Error },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { sink, source } => {
                write!(f, "Write to sink '{sink}' failed: {source}")
            }
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Write { source, .. } => Some(source),
        }
    }
}

impl From<SinkError> for UnilogError {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

/// Convenience type alias for Unilog results.
pub type Result<T> = std::result::Result<T, UnilogError>;

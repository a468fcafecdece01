// Unilog - cli/registry.rs
//
// Command registry: a name-to-callable mapping with a typed parameter list
// that the CLI surface introspects into generated subcommands.
//
// Error separation is deliberate: registration and lookup problems are the
// registry's own errors, while a handler's runtime failure propagates
// unmodified inside `InvokeError::Handler`.

use std::collections::BTreeMap;
use std::fmt;

use crate::util::error::{CommandError, InvokeError};

// =============================================================================
// Parameters and arguments
// =============================================================================

/// Primitive parameter types supported by the generated CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Text,
    Bool,
}

impl ParamKind {
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::Text => "text",
            ParamKind::Bool => "bool",
        }
    }
}

/// One declared parameter of a command.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    /// Required integer parameter.
    pub fn int(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Int,
            required: true,
        }
    }

    /// Required text parameter.
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Text,
            required: true,
        }
    }

    /// Boolean flag. Flags are never required; absent means false.
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Bool,
            required: false,
        }
    }

    /// Mark this parameter optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// A typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl ArgValue {
    fn kind(&self) -> ParamKind {
        match self {
            ArgValue::Int(_) => ParamKind::Int,
            ArgValue::Text(_) => ParamKind::Text,
            ArgValue::Bool(_) => ParamKind::Bool,
        }
    }

    /// Parse a raw string as the given kind. Used by the GUI command runner;
    /// the CLI path gets typed values from clap directly.
    pub fn parse(kind: ParamKind, raw: &str) -> Result<ArgValue, String> {
        match kind {
            ParamKind::Int => raw
                .trim()
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|_| format!("'{raw}' is not an integer")),
            ParamKind::Text => Ok(ArgValue::Text(raw.to_string())),
            ParamKind::Bool => match raw.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(ArgValue::Bool(true)),
                "false" | "no" | "0" | "off" | "" => Ok(ArgValue::Bool(false)),
                _ => Err(format!("'{raw}' is not a boolean")),
            },
        }
    }
}

/// Named argument values passed to a command invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandArgs {
    values: BTreeMap<String, ArgValue>,
}

impl CommandArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: ArgValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn with(mut self, name: &str, value: ArgValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    /// Flag lookup; an absent flag reads as false.
    pub fn get_bool(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Bool(true)))
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &ArgValue)> {
        self.values.iter()
    }

    fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }
}

// =============================================================================
// Command spec
// =============================================================================

/// A command's runtime result. Handlers return their output text; the facade
/// decides how to display it.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The registered callable.
pub type CommandHandler = Box<dyn FnMut(&CommandArgs) -> Result<String, HandlerError>>;

/// A registered command: name, description, typed parameter list, handler.
/// Immutable after registration.
pub struct CommandSpec {
    pub name: String,
    pub about: String,
    pub params: Vec<ParamSpec>,
    handler: CommandHandler,
}

impl CommandSpec {
    pub fn new(
        name: &str,
        about: &str,
        handler: impl FnMut(&CommandArgs) -> Result<String, HandlerError> + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            about: about.to_string(),
            params: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }
}

// Handler closures have no useful Debug form; show the introspectable parts.
impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// All registered commands, keyed by name.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Duplicate names are rejected.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), CommandError> {
        if self.commands.contains_key(&spec.name) {
            return Err(CommandError::Duplicate {
                name: spec.name.clone(),
            });
        }
        tracing::debug!(command = %spec.name, params = spec.params.len(), "Command registered");
        self.commands.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Invoke a command with validated arguments.
    ///
    /// Argument validation failures are the registry's errors; whatever the
    /// handler itself raises comes back unmodified in `InvokeError::Handler`.
    pub fn invoke(&mut self, name: &str, args: &CommandArgs) -> Result<String, InvokeError> {
        let spec = self
            .commands
            .get_mut(name)
            .ok_or_else(|| InvokeError::Unknown {
                name: name.to_string(),
            })?;

        validate_args(&spec.name, &spec.params, args)?;

        (spec.handler)(args).map_err(|e| InvokeError::Handler {
            command: name.to_string(),
            source: e,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Registered specs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }
}

fn validate_args(
    command: &str,
    params: &[ParamSpec],
    args: &CommandArgs,
) -> Result<(), InvokeError> {
    for param in params {
        match args.get(&param.name) {
            Some(value) if value.kind() != param.kind => {
                return Err(InvokeError::InvalidArguments {
                    command: command.to_string(),
                    reason: format!(
                        "'{}' expects {}, got {}",
                        param.name,
                        param.kind.label(),
                        value.kind().label()
                    ),
                });
            }
            None if param.required => {
                return Err(InvokeError::InvalidArguments {
                    command: command.to_string(),
                    reason: format!("missing required argument '{}'", param.name),
                });
            }
            _ => {}
        }
    }

    for (name, _) in args.iter() {
        if !params.iter().any(|p| &p.name == name) {
            return Err(InvokeError::InvalidArguments {
                command: command.to_string(),
                reason: format!("unexpected argument '{name}'"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_spec() -> CommandSpec {
        CommandSpec::new("echo", "Echo the message", |args| {
            Ok(args.get_text("message").unwrap_or("").to_string())
        })
        .param(ParamSpec::text("message"))
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(echo_spec()).unwrap();

        let err = registry.register(echo_spec()).unwrap_err();
        assert!(matches!(err, CommandError::Duplicate { name } if name == "echo"));
        assert_eq!(registry.len(), 1, "the first registration survives");
    }

    #[test]
    fn unknown_command_is_rejected() {
        let mut registry = CommandRegistry::new();
        let err = registry.invoke("nope", &CommandArgs::new()).unwrap_err();
        assert!(matches!(err, InvokeError::Unknown { name } if name == "nope"));
    }

    #[test]
    fn invoke_runs_handler_with_args() {
        let mut registry = CommandRegistry::new();
        registry.register(echo_spec()).unwrap();

        let args = CommandArgs::new().with("message", ArgValue::Text("hi".into()));
        assert_eq!(registry.invoke("echo", &args).unwrap(), "hi");
    }

    #[test]
    fn missing_required_argument_is_invalid() {
        let mut registry = CommandRegistry::new();
        registry.register(echo_spec()).unwrap();

        let err = registry.invoke("echo", &CommandArgs::new()).unwrap_err();
        assert!(
            matches!(err, InvokeError::InvalidArguments { ref reason, .. }
                if reason.contains("message")),
            "got {err:?}"
        );
    }

    #[test]
    fn mistyped_argument_is_invalid() {
        let mut registry = CommandRegistry::new();
        registry.register(echo_spec()).unwrap();

        let args = CommandArgs::new().with("message", ArgValue::Int(7));
        let err = registry.invoke("echo", &args).unwrap_err();
        assert!(matches!(err, InvokeError::InvalidArguments { .. }), "got {err:?}");
    }

    #[test]
    fn unexpected_argument_is_invalid() {
        let mut registry = CommandRegistry::new();
        registry.register(echo_spec()).unwrap();

        let args = CommandArgs::new()
            .with("message", ArgValue::Text("hi".into()))
            .with("volume", ArgValue::Int(11));
        let err = registry.invoke("echo", &args).unwrap_err();
        assert!(
            matches!(err, InvokeError::InvalidArguments { ref reason, .. }
                if reason.contains("volume")),
            "got {err:?}"
        );
    }

    #[test]
    fn handler_error_propagates_unmodified() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandSpec::new("fail", "Always fails", |_| {
                Err("division by zero".into())
            }))
            .unwrap();

        let err = registry.invoke("fail", &CommandArgs::new()).unwrap_err();
        match err {
            InvokeError::Handler { command, source } => {
                assert_eq!(command, "fail");
                assert_eq!(source.to_string(), "division by zero");
            }
            other => panic!("expected Handler, got {other:?}"),
        }
    }

    #[test]
    fn optional_parameters_may_be_absent() {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                CommandSpec::new("greet", "Greet someone", |args| {
                    let name = args.get_text("name").unwrap_or("world");
                    let shout = args.get_bool("shout");
                    let text = format!("hello {name}");
                    Ok(if shout { text.to_uppercase() } else { text })
                })
                .param(ParamSpec::text("name").optional())
                .param(ParamSpec::flag("shout")),
            )
            .unwrap();

        assert_eq!(registry.invoke("greet", &CommandArgs::new()).unwrap(), "hello world");

        let args = CommandArgs::new()
            .with("name", ArgValue::Text("ada".into()))
            .with("shout", ArgValue::Bool(true));
        assert_eq!(registry.invoke("greet", &args).unwrap(), "HELLO ADA");
    }

    #[test]
    fn arg_value_parse_round_trips_primitives() {
        assert_eq!(ArgValue::parse(ParamKind::Int, "42"), Ok(ArgValue::Int(42)));
        assert!(ArgValue::parse(ParamKind::Int, "forty-two").is_err());
        assert_eq!(
            ArgValue::parse(ParamKind::Bool, "yes"),
            Ok(ArgValue::Bool(true))
        );
        assert!(ArgValue::parse(ParamKind::Bool, "maybe").is_err());
        assert_eq!(
            ArgValue::parse(ParamKind::Text, "anything"),
            Ok(ArgValue::Text("anything".into()))
        );
    }
}

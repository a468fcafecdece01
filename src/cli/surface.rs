// Unilog - cli/surface.rs
//
// The generated command-line surface: a derived struct for the facade's
// global flags, augmented onto a dynamically built clap command carrying one
// subcommand per registered command.
//
// The flags are static and therefore derived; registered commands are only
// known at runtime, so their subcommands go through the builder API and are
// mapped back to typed `CommandArgs` after parsing.

use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches};
use std::path::PathBuf;

use crate::cli::registry::{ArgValue, CommandArgs, CommandRegistry, CommandSpec, ParamKind};
use crate::util::constants;

/// Global options recognised in front of any subcommand.
#[derive(Args, Debug, Default)]
pub struct GlobalOpts {
    /// Minimum log level (DEBUG, INFO, WARNING, ERROR, CRITICAL).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Folder for rotated log files.
    #[arg(long = "log-folder", value_name = "PATH")]
    pub log_folder: Option<PathBuf>,

    /// Record template with {time}, {level}, {message} placeholders.
    #[arg(long = "log-format", value_name = "TEMPLATE")]
    pub log_format: Option<String>,

    /// Interfaces to activate: "cli", "gui", or "cli,gui".
    #[arg(long = "interfaces", value_name = "MODES")]
    pub interfaces: Option<String>,

    /// Enable internal diagnostics (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}

/// Build the full CLI: global flags plus one subcommand per registered
/// command.
pub fn build_command(app_name: &str, registry: &CommandRegistry) -> Command {
    let mut cmd = Command::new(app_name.to_string())
        .version(constants::APP_VERSION)
        .about("Unified logging facade")
        .subcommand_required(false)
        .arg_required_else_help(false);

    cmd = GlobalOpts::augment_args(cmd);

    for spec in registry.iter() {
        cmd = cmd.subcommand(subcommand_for(spec));
    }
    cmd
}

/// Parse argv. clap handles --help/--version and malformed flags itself.
pub fn parse(app_name: &str, registry: &CommandRegistry) -> clap::error::Result<ArgMatches> {
    build_command(app_name, registry).try_get_matches()
}

/// Extract the derived global options from parsed matches.
pub fn global_opts(matches: &ArgMatches) -> GlobalOpts {
    GlobalOpts::from_arg_matches(matches).unwrap_or_default()
}

/// Generate the subcommand for one registered command. Each parameter
/// becomes a long flag of its primitive type.
fn subcommand_for(spec: &CommandSpec) -> Command {
    let mut sub = Command::new(spec.name.clone()).about(spec.about.clone());
    for param in &spec.params {
        let arg = Arg::new(param.name.clone()).long(param.name.clone());
        let arg = match param.kind {
            ParamKind::Int => arg
                .value_name("INT")
                .value_parser(clap::value_parser!(i64))
                .required(param.required),
            ParamKind::Text => arg
                .value_name("TEXT")
                .value_parser(clap::value_parser!(String))
                .required(param.required),
            ParamKind::Bool => arg.action(ArgAction::SetTrue),
        };
        sub = sub.arg(arg);
    }
    sub
}

/// Convert a subcommand's parsed matches back into typed arguments.
pub fn args_from_matches(spec: &CommandSpec, matches: &ArgMatches) -> CommandArgs {
    let mut args = CommandArgs::new();
    for param in &spec.params {
        match param.kind {
            ParamKind::Int => {
                if let Some(v) = matches.get_one::<i64>(&param.name) {
                    args.insert(&param.name, ArgValue::Int(*v));
                }
            }
            ParamKind::Text => {
                if let Some(v) = matches.get_one::<String>(&param.name) {
                    args.insert(&param.name, ArgValue::Text(v.clone()));
                }
            }
            ParamKind::Bool => {
                args.insert(&param.name, ArgValue::Bool(matches.get_flag(&param.name)));
            }
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::registry::ParamSpec;

    fn registry_with_divide() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                CommandSpec::new("divide", "Divide x by y", |args| {
                    let x = args.get_int("x").unwrap_or(0);
                    let y = args.get_int("y").unwrap_or(1);
                    Ok(format!("{}", x / y))
                })
                .param(ParamSpec::int("x"))
                .param(ParamSpec::int("y"))
                .param(ParamSpec::flag("gui")),
            )
            .unwrap();
        registry
    }

    #[test]
    fn registered_commands_become_subcommands() {
        let registry = registry_with_divide();
        let matches = build_command("testapp", &registry)
            .try_get_matches_from(["testapp", "divide", "--x", "10", "--y", "2"])
            .unwrap();

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "divide");

        let spec = registry.get("divide").unwrap();
        let args = args_from_matches(spec, sub);
        assert_eq!(args.get_int("x"), Some(10));
        assert_eq!(args.get_int("y"), Some(2));
        assert!(!args.get_bool("gui"));
    }

    #[test]
    fn bool_params_are_flags() {
        let registry = registry_with_divide();
        let matches = build_command("testapp", &registry)
            .try_get_matches_from(["testapp", "divide", "--x", "1", "--y", "1", "--gui"])
            .unwrap();

        let (_, sub) = matches.subcommand().unwrap();
        let args = args_from_matches(registry.get("divide").unwrap(), sub);
        assert!(args.get_bool("gui"));
    }

    #[test]
    fn missing_required_flag_fails_at_parse_time() {
        let registry = registry_with_divide();
        let result = build_command("testapp", &registry)
            .try_get_matches_from(["testapp", "divide", "--x", "10"]);
        assert!(result.is_err(), "clap should reject a missing required flag");
    }

    #[test]
    fn global_flags_parse_in_front_of_subcommands() {
        let registry = registry_with_divide();
        let matches = build_command("testapp", &registry)
            .try_get_matches_from([
                "testapp",
                "--log-level",
                "ERROR",
                "--debug",
                "divide",
                "--x",
                "4",
                "--y",
                "2",
            ])
            .unwrap();

        let opts = global_opts(&matches);
        assert_eq!(opts.log_level.as_deref(), Some("ERROR"));
        assert!(opts.debug);
    }

    #[test]
    fn no_subcommand_is_accepted() {
        let registry = registry_with_divide();
        let matches = build_command("testapp", &registry)
            .try_get_matches_from(["testapp"])
            .unwrap();
        assert!(matches.subcommand().is_none());
    }
}

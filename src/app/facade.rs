// Unilog - app/facade.rs
//
// The public facade: one object wiring configuration, sinks, the command
// registry, and the viewer together.
//
// `run` drives the interface-mode state machine. The GUI owns the main
// thread: with both interfaces active, a subcommand present on argv is
// dispatched synchronously first and the event loop starts afterwards.

use crate::app::context::{LoggerConfig, LoggerContext};
use crate::cli::{surface, CommandArgs, CommandRegistry, CommandSpec};
use crate::core::buffer::ViewerHandle;
use crate::core::model::Severity;
use crate::sink::SinkHandle;
use crate::util::error::{InvokeError, Result, UnilogError};
use crate::util::logging;

// =============================================================================
// Interface phase
// =============================================================================

/// Lifecycle states of a facade. Transitions are driven by `run` and logged
/// through the diagnostics channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    CliActive,
    GuiActive,
    BothActive,
    ShuttingDown,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::CliActive => "cli-active",
            Phase::GuiActive => "gui-active",
            Phase::BothActive => "both-active",
            Phase::ShuttingDown => "shutting-down",
        }
    }
}

// =============================================================================
// Facade
// =============================================================================

/// Unified logging facade: console, file, and GUI output plus a generated
/// CLI, behind one object.
pub struct UnifiedLogger {
    ctx: LoggerContext,
    commands: CommandRegistry,
    phase: Phase,
}

impl UnifiedLogger {
    /// Construct with an explicit configuration. Configuration problems
    /// (bad level name, unwritable log folder) abort construction.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let ctx = LoggerContext::new(config).map_err(UnilogError::Config)?;
        Ok(Self {
            ctx,
            commands: CommandRegistry::new(),
            phase: Phase::Uninitialized,
        })
    }

    /// Construct with built-in defaults overlaid with the platform
    /// config.toml.
    pub fn with_defaults(app_name: &str) -> Result<Self> {
        let config = LoggerConfig::load(app_name).map_err(UnilogError::Config)?;
        Self::new(config)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &LoggerConfig {
        self.ctx.config()
    }

    /// Shared handle to the viewer buffer.
    pub fn viewer(&self) -> ViewerHandle {
        self.ctx.viewer()
    }

    // -------------------------------------------------------------------------
    // Logging surface
    // -------------------------------------------------------------------------

    /// Log a message to every admitting sink, and to the GUI when asked.
    pub fn display(&mut self, message: &str, keyword: &str, to_gui: bool) -> Result<()> {
        self.ctx.display(message, keyword, to_gui)
    }

    /// Log an error with its full source chain at Error severity.
    pub fn log_exception(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        to_gui: bool,
    ) -> Result<()> {
        self.ctx.log_exception(error, to_gui)
    }

    /// Log an error with its source chain and a captured backtrace.
    pub fn custom_traceback(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        to_gui: bool,
    ) -> Result<()> {
        self.ctx.custom_traceback(error, to_gui)
    }

    /// Change the minimum level; every sink is re-registered.
    pub fn set_level(&mut self, level: Severity) -> Result<()> {
        self.ctx.set_level(level)
    }

    /// Change the record template; every sink is re-registered.
    pub fn set_format(&mut self, format: &str) -> Result<()> {
        self.ctx.set_format(format)
    }

    /// Register a stderr sink at the current level and format.
    pub fn add_stderr_sink(&mut self) -> SinkHandle {
        self.ctx.add_stderr_sink()
    }

    /// Register a callback sink with its own minimum level.
    pub fn add_callback_sink(
        &mut self,
        callback: crate::sink::SinkCallback,
        min_level: Severity,
    ) -> SinkHandle {
        self.ctx.add_callback_sink(callback, min_level)
    }

    /// Register a secondary file sink in another folder.
    pub fn add_file_sink(
        &mut self,
        folder: &std::path::Path,
        min_level: Severity,
    ) -> Result<SinkHandle> {
        self.ctx.add_file_sink(folder, min_level)
    }

    /// Remove a previously registered sink.
    pub fn remove_sink(&mut self, handle: SinkHandle) -> bool {
        self.ctx.remove_sink(handle)
    }

    /// Wrap an iterator in a labelled CLI progress bar. Value-preserving.
    pub fn progress_bar<I>(
        &self,
        iterable: I,
        label: &str,
    ) -> indicatif::ProgressBarIter<I::IntoIter>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
    {
        crate::cli::progress::wrap(iterable, label)
    }

    // -------------------------------------------------------------------------
    // Command surface
    // -------------------------------------------------------------------------

    /// Register a CLI command. Duplicate names are rejected.
    pub fn add_command(&mut self, spec: CommandSpec) -> Result<()> {
        self.commands.register(spec).map_err(UnilogError::Command)
    }

    // -------------------------------------------------------------------------
    // Run loop
    // -------------------------------------------------------------------------

    /// Activate the configured interfaces and block until they finish.
    ///
    /// Returns the process exit code: 0 on success, non-zero when a CLI
    /// command failed. Closing the GUI window ends a GUI session normally.
    pub fn run(mut self) -> Result<i32> {
        let mut exit_code = 0;

        if self.ctx.config().interfaces.cli {
            let app_name = self.ctx.config().app_name.clone();
            let matches = match surface::parse(&app_name, &self.commands) {
                Ok(matches) => matches,
                Err(e) => {
                    // clap already rendered help/usage/version output.
                    let code = e.exit_code();
                    let _ = e.print();
                    return Ok(code);
                }
            };

            let opts = surface::global_opts(&matches);
            logging::init(
                opts.debug || self.ctx.config().debug,
                self.ctx.config().diagnostics_level.as_deref(),
            );
            self.ctx.apply_cli_overrides(&opts)?;

            if let Some((name, sub)) = matches.subcommand() {
                let gui = self.ctx.config().interfaces.gui;
                self.transition(if gui { Phase::BothActive } else { Phase::CliActive });
                let name = name.to_string();
                let args = match self.commands.get(&name) {
                    Some(spec) => surface::args_from_matches(spec, sub),
                    None => CommandArgs::new(),
                };
                exit_code = self.dispatch(&name, &args)?;
            } else if !self.ctx.config().interfaces.gui {
                self.transition(Phase::CliActive);
                let mut cmd = surface::build_command(&app_name, &self.commands);
                let _ = cmd.print_help();
            }
        } else {
            logging::init(
                self.ctx.config().debug,
                self.ctx.config().diagnostics_level.as_deref(),
            );
        }

        if self.ctx.config().interfaces.gui {
            let phase = if self.ctx.config().interfaces.cli {
                Phase::BothActive
            } else {
                Phase::GuiActive
            };
            self.transition(phase);

            let UnifiedLogger { ctx, commands, .. } = self;
            crate::ui::viewer::run(ctx, commands).map_err(|e| UnilogError::Gui {
                source: e.to_string().into(),
            })?;

            tracing::info!(phase = Phase::ShuttingDown.label(), "Facade state changed");
            return Ok(exit_code);
        }

        self.transition(Phase::ShuttingDown);
        Ok(exit_code)
    }

    /// Dispatch one parsed subcommand. Handler output goes to stdout and to
    /// the sinks; failures are captured, emitted at Error severity, and
    /// reflected in the exit code.
    fn dispatch(&mut self, name: &str, args: &CommandArgs) -> Result<i32> {
        match self.commands.invoke(name, args) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}");
                    self.ctx.display(&output, "success", true)?;
                }
                Ok(0)
            }
            Err(e @ InvokeError::Unknown { .. })
            | Err(e @ InvokeError::InvalidArguments { .. }) => {
                eprintln!("Error: {e}");
                self.ctx.display(&e.to_string(), "error", true)?;
                Ok(2)
            }
            Err(InvokeError::Handler { command, source }) => {
                eprintln!("Error: command '{command}' failed: {source}");
                let error: &(dyn std::error::Error + 'static) = source.as_ref();
                self.ctx.log_exception(error, true)?;
                Ok(1)
            }
        }
    }

    fn transition(&mut self, to: Phase) {
        tracing::info!(from = self.phase.label(), to = to.label(), "Facade state changed");
        self.phase = to;
    }
}

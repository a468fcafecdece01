// Unilog - app/context.rs
//
// Runtime configuration and the logger context: the explicitly owned state
// behind the facade. The sink registry and viewer handle live here -- there
// is no ambient global registry; a context belongs to exactly one facade
// and is its single writer.

use chrono::Local;
use std::backtrace::Backtrace;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cli::GlobalOpts;
use crate::core::buffer::ViewerHandle;
use crate::core::classify;
use crate::core::model::{LogEntry, Severity, Toast};
use crate::platform::config::{self, PlatformPaths, RawConfig};
use crate::sink::{FileSink, RotationPolicy, SinkHandle, SinkRegistry, SinkTarget};
use crate::util::constants;
use crate::util::error::{ConfigError, Result, UnilogError};

// =============================================================================
// Interface mode
// =============================================================================

/// Which interfaces the facade activates when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceMode {
    pub cli: bool,
    pub gui: bool,
}

impl InterfaceMode {
    pub fn cli_only() -> Self {
        Self {
            cli: true,
            gui: false,
        }
    }

    pub fn gui_only() -> Self {
        Self {
            cli: false,
            gui: true,
        }
    }

    pub fn both() -> Self {
        Self {
            cli: true,
            gui: true,
        }
    }

    /// Parse an interfaces string such as "cli", "gui", or "cli,gui".
    /// Unknown tokens are fatal configuration errors.
    pub fn parse(value: &str) -> std::result::Result<Self, ConfigError> {
        let mut mode = Self {
            cli: false,
            gui: false,
        };
        for token in value.split(',') {
            match token.trim().to_lowercase().as_str() {
                "cli" => mode.cli = true,
                "gui" => mode.gui = true,
                other => {
                    return Err(ConfigError::InvalidInterface {
                        value: other.to_string(),
                    })
                }
            }
        }
        if !mode.cli && !mode.gui {
            return Err(ConfigError::InvalidInterface {
                value: value.to_string(),
            });
        }
        Ok(mode)
    }

    pub fn label(&self) -> &'static str {
        match (self.cli, self.gui) {
            (true, true) => "cli,gui",
            (true, false) => "cli",
            (false, true) => "gui",
            (false, false) => "none",
        }
    }
}

// =============================================================================
// Logger configuration
// =============================================================================

/// Complete facade configuration. Validated at construction; `level` and
/// `format` may change afterwards through `set_level`/`set_format`.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Application name: window title, CLI name, log file prefix.
    pub app_name: String,

    /// Interfaces activated by `run`.
    pub interfaces: InterfaceMode,

    /// Minimum severity admitted by the default sinks.
    pub level: Severity,

    /// Folder receiving rotated log files.
    pub log_folder: PathBuf,

    /// Record template with {time}, {level}, {message} placeholders.
    pub format: String,

    /// Rotation policy for the primary file sink.
    pub rotation: RotationPolicy,

    /// Viewer redraw cadence.
    pub redraw_interval: Duration,

    /// Toast display duration.
    pub toast_duration: Duration,

    /// Dark theme on startup.
    pub dark_mode: bool,

    /// Internal diagnostics enabled from the start.
    pub debug: bool,

    /// Internal diagnostics level from config.toml, if any.
    pub diagnostics_level: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            app_name: constants::APP_NAME.to_string(),
            interfaces: InterfaceMode::both(),
            // DEFAULT_LEVEL is a canonical name; parsing cannot fail.
            level: Severity::parse(constants::DEFAULT_LEVEL)
                .unwrap_or(Severity::Debug),
            log_folder: PathBuf::from(constants::DEFAULT_LOG_FOLDER),
            format: constants::DEFAULT_FORMAT.to_string(),
            rotation: RotationPolicy::Daily,
            redraw_interval: Duration::from_millis(constants::REDRAW_INTERVAL_NORMAL_MS),
            toast_duration: Duration::from_millis(constants::DEFAULT_TOAST_DURATION_MS),
            dark_mode: true,
            debug: false,
            diagnostics_level: None,
        }
    }
}

impl LoggerConfig {
    /// Defaults overlaid with the platform config.toml (when present).
    pub fn load(app_name: &str) -> std::result::Result<Self, ConfigError> {
        let mut cfg = Self {
            app_name: app_name.to_string(),
            ..Self::default()
        };
        let paths = PlatformPaths::resolve();
        let raw = config::load_config(&paths.config_file())?;
        cfg.apply_raw(&raw)?;
        Ok(cfg)
    }

    /// Overlay values from a parsed config.toml.
    pub fn apply_raw(&mut self, raw: &RawConfig) -> std::result::Result<(), ConfigError> {
        if let Some(level) = &raw.logging.level {
            self.level = Severity::parse(level)?;
        }
        if let Some(folder) = &raw.logging.folder {
            self.log_folder = PathBuf::from(folder);
        }
        if let Some(format) = &raw.logging.format {
            self.format = format.clone();
        }
        self.diagnostics_level = raw.logging.diagnostics.clone();
        if let Some(interfaces) = &raw.ui.interfaces {
            self.interfaces = InterfaceMode::parse(interfaces)?;
        }
        if let Some(ms) = raw.ui.redraw_interval_ms {
            self.redraw_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.ui.toast_duration_ms {
            self.toast_duration = Duration::from_millis(ms);
        }
        if let Some(dark) = raw.ui.dark_mode {
            self.dark_mode = dark;
        }
        Ok(())
    }
}

// =============================================================================
// Logger context
// =============================================================================

/// The facade's owned logging state: configuration, sink registry, entry id
/// counter, and the shared viewer handle.
pub struct LoggerContext {
    config: LoggerConfig,
    sinks: SinkRegistry,
    viewer: ViewerHandle,
    next_id: u64,
}

impl LoggerContext {
    /// Validate the configuration and open the primary file sink. Any
    /// failure here aborts construction.
    pub fn new(config: LoggerConfig) -> std::result::Result<Self, ConfigError> {
        let mut sinks = SinkRegistry::new();
        let file = FileSink::create(&config.log_folder, &config.app_name, config.rotation)?;
        sinks.register(
            SinkTarget::File(file),
            config.level,
            &config.format,
            true,
        );

        let viewer = ViewerHandle::new(config.redraw_interval);

        tracing::info!(
            app = %config.app_name,
            level = %config.level,
            folder = %config.log_folder.display(),
            interfaces = config.interfaces.label(),
            "Logger context initialised"
        );

        Ok(Self {
            config,
            sinks,
            viewer,
            next_id: 0,
        })
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Shared handle to the viewer state.
    pub fn viewer(&self) -> ViewerHandle {
        self.viewer.clone()
    }

    // -------------------------------------------------------------------------
    // Emission
    // -------------------------------------------------------------------------

    /// Log a message. `keyword` drives both the severity and the icon/style
    /// presentation; `to_gui` additionally raises a toast and a viewer entry
    /// when a GUI interface is configured.
    pub fn display(&mut self, message: &str, keyword: &str, to_gui: bool) -> Result<()> {
        let entry = self.make_entry(message, keyword);
        self.sinks.emit(&entry)?;
        if to_gui && self.config.interfaces.gui {
            self.fan_out_to_gui(entry);
        }
        Ok(())
    }

    /// Log an error with its full source chain at Error severity.
    pub fn log_exception(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        to_gui: bool,
    ) -> Result<()> {
        let message = format_error_chain(error);
        self.display(&message, "error", to_gui)
    }

    /// Log an error with its source chain and a captured stack backtrace at
    /// Error severity.
    pub fn custom_traceback(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        to_gui: bool,
    ) -> Result<()> {
        let backtrace = Backtrace::force_capture();
        let message = format!(
            "Custom traceback:\n{}\nstack backtrace:\n{backtrace}",
            format_error_chain(error)
        );
        self.display(&message, "error", to_gui)
    }

    fn make_entry(&mut self, message: &str, keyword: &str) -> LogEntry {
        let id = self.next_id;
        self.next_id += 1;
        LogEntry {
            id,
            timestamp: Local::now(),
            severity: Severity::from_keyword(keyword),
            keyword: keyword.to_string(),
            message: message.to_string(),
            presentation: classify::classify(keyword),
        }
    }

    fn fan_out_to_gui(&self, entry: LogEntry) {
        let toast = Toast {
            message: entry.message.clone(),
            presentation: entry.presentation,
            duration: self.config.toast_duration,
            raised_at: Instant::now(),
        };
        self.viewer.append(entry);
        self.viewer.push_toast(toast);
    }

    // -------------------------------------------------------------------------
    // Runtime reconfiguration
    // -------------------------------------------------------------------------

    /// Change the minimum level. All sinks are removed and re-registered
    /// with the new threshold; nothing is mutated in place.
    pub fn set_level(&mut self, level: Severity) -> Result<()> {
        self.config.level = level;
        self.sinks.rebuild_with_level(level)?;
        tracing::info!(level = %level, "Log level changed");
        Ok(())
    }

    /// Change the record template, re-registering every sink.
    pub fn set_format(&mut self, format: &str) -> Result<()> {
        self.config.format = format.to_string();
        self.sinks.rebuild_with_template(format)?;
        tracing::info!(format = %format, "Log format changed");
        Ok(())
    }

    /// Move the primary file sink to another folder. Subsequent records go
    /// to a fresh dated file there; secondary sinks are untouched.
    pub fn set_log_folder(&mut self, folder: &std::path::Path) -> Result<()> {
        let file = FileSink::create(folder, &self.config.app_name, self.config.rotation)
            .map_err(UnilogError::Config)?;
        self.config.log_folder = folder.to_path_buf();
        self.sinks.replace_primary_file(file);
        Ok(())
    }

    /// Apply command-line overrides in place: level and format rebuild the
    /// registry, a folder change moves the primary sink.
    pub fn apply_cli_overrides(&mut self, opts: &GlobalOpts) -> Result<()> {
        if let Some(level) = &opts.log_level {
            let level = Severity::parse(level).map_err(UnilogError::Config)?;
            self.set_level(level)?;
        }
        if let Some(format) = &opts.log_format {
            self.set_format(format)?;
        }
        if let Some(folder) = &opts.log_folder {
            self.set_log_folder(folder)?;
        }
        if let Some(interfaces) = &opts.interfaces {
            self.config.interfaces =
                InterfaceMode::parse(interfaces).map_err(UnilogError::Config)?;
        }
        if opts.debug {
            self.config.debug = true;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Additional sinks
    // -------------------------------------------------------------------------

    /// Register a stderr sink at the current level and format.
    pub fn add_stderr_sink(&mut self) -> SinkHandle {
        self.sinks.register(
            SinkTarget::Stderr,
            self.config.level,
            &self.config.format,
            false,
        )
    }

    /// Register a callback sink with its own minimum level.
    pub fn add_callback_sink(
        &mut self,
        callback: crate::sink::SinkCallback,
        min_level: Severity,
    ) -> SinkHandle {
        self.sinks
            .register(SinkTarget::Callback(callback), min_level, &self.config.format, false)
    }

    /// Register a secondary file sink in another folder.
    pub fn add_file_sink(
        &mut self,
        folder: &std::path::Path,
        min_level: Severity,
    ) -> Result<SinkHandle> {
        let file = FileSink::create(folder, &self.config.app_name, self.config.rotation)
            .map_err(UnilogError::Config)?;
        Ok(self
            .sinks
            .register(SinkTarget::File(file), min_level, &self.config.format, false))
    }

    /// Remove a sink by handle. Returns false for unknown handles.
    pub fn remove_sink(&mut self, handle: SinkHandle) -> bool {
        self.sinks.remove(handle)
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

/// "Exception: <error> | caused by: <source> | caused by: ..." -- the whole
/// std error chain in one line.
pub fn format_error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = format!("Exception: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(" | caused by: {cause}"));
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    fn test_config(dir: &std::path::Path) -> LoggerConfig {
        LoggerConfig {
            app_name: "testapp".to_string(),
            log_folder: dir.to_path_buf(),
            ..LoggerConfig::default()
        }
    }

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn interface_mode_parses_known_tokens() {
        assert_eq!(InterfaceMode::parse("cli").unwrap(), InterfaceMode::cli_only());
        assert_eq!(InterfaceMode::parse("gui").unwrap(), InterfaceMode::gui_only());
        assert_eq!(InterfaceMode::parse("cli,gui").unwrap(), InterfaceMode::both());
        assert_eq!(InterfaceMode::parse(" GUI , CLI ").unwrap(), InterfaceMode::both());
    }

    #[test]
    fn interface_mode_rejects_unknown_tokens() {
        assert!(InterfaceMode::parse("web").is_err());
        assert!(InterfaceMode::parse("").is_err());
    }

    #[test]
    fn construction_fails_on_unwritable_log_folder() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let config = test_config(&blocker.join("logs"));
        assert!(LoggerContext::new(config).is_err());
    }

    #[test]
    fn display_appends_to_viewer_only_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = LoggerContext::new(test_config(dir.path())).unwrap();

        ctx.display("to sinks only", "info", false).unwrap();
        ctx.display("and to the gui", "warning", true).unwrap();

        let viewer = ctx.viewer();
        let state = viewer.lock();
        assert_eq!(state.len(), 1);
        assert_eq!(state.toasts().len(), 1);
        assert_eq!(state.toasts()[0].message, "and to the gui");
    }

    #[test]
    fn gui_fan_out_is_suppressed_in_cli_only_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.interfaces = InterfaceMode::cli_only();
        let mut ctx = LoggerContext::new(config).unwrap();

        ctx.display("no gui session", "info", true).unwrap();

        let viewer = ctx.viewer();
        assert_eq!(viewer.lock().len(), 0);
    }

    #[test]
    fn sink_registration_and_removal_track_the_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = LoggerContext::new(test_config(dir.path())).unwrap();
        assert_eq!(ctx.sink_count(), 1); // primary file sink

        let stderr = ctx.add_stderr_sink();
        let callback = ctx.add_callback_sink(Box::new(|_| Ok(())), Severity::Error);
        assert_eq!(ctx.sink_count(), 3);

        assert!(ctx.remove_sink(stderr));
        assert!(ctx.remove_sink(callback));
        assert!(!ctx.remove_sink(callback));
        assert_eq!(ctx.sink_count(), 1);
    }

    #[test]
    fn entry_ids_are_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = LoggerContext::new(test_config(dir.path())).unwrap();

        ctx.display("a", "info", true).unwrap();
        ctx.display("b", "info", true).unwrap();
        ctx.display("c", "info", true).unwrap();

        let viewer = ctx.viewer();
        let mut state = viewer.lock();
        state.flush(Instant::now());
        let ids: Vec<u64> = state.visible().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn format_error_chain_walks_sources() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        let message = format_error_chain(&err);
        assert!(message.starts_with("Exception: request failed"));
        assert!(message.contains("caused by: connection refused"));
    }

    #[test]
    fn log_exception_emits_error_severity_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = LoggerContext::new(test_config(dir.path())).unwrap();

        let err = Outer(std::io::Error::other("disk on fire"));
        ctx.log_exception(&err, true).unwrap();

        let viewer = ctx.viewer();
        let mut state = viewer.lock();
        state.flush(Instant::now());
        let entry = &state.visible()[0];
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(entry.presentation.icon, "times-circle");
        assert!(entry.message.contains("disk on fire"));
    }
}

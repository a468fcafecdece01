// Unilog - util/logging.rs
//
// Internal diagnostics for the crate itself, distinct from the user-facing
// sinks the facade manages. Unilog *is* a logging library, so its own
// tracing output stays on stderr and is silent unless asked for.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug (sets the filter to debug)
//   - Config file: [logging] diagnostics = "debug"
//
// Never logs the content of user log messages at any level.

use tracing_subscriber::EnvFilter;

/// Initialise the internal diagnostics subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the diagnostics level from config.toml (if present).
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default.
///
/// Safe to call more than once: a second facade (or a test harness) finding
/// a subscriber already installed is not an error.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_DIAG_LEVEL)
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();

    if result.is_ok() {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Diagnostics initialised"
        );
    }
}

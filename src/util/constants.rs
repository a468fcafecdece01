// Unilog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name used when the embedding app does not supply one.
pub const APP_NAME: &str = "Unilog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Unilog";

/// Current crate version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Sink defaults
// =============================================================================

/// Default minimum severity for newly constructed facades.
pub const DEFAULT_LEVEL: &str = "DEBUG";

/// Default record template applied to every sink.
/// Placeholders: `{time}`, `{level}`, `{message}`.
pub const DEFAULT_FORMAT: &str = "{time} [{level}] {message}";

/// chrono format string used to render the `{time}` placeholder.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Default log folder, relative to the working directory.
pub const DEFAULT_LOG_FOLDER: &str = "logs";

/// File extension for rotated log files.
pub const LOG_FILE_EXT: &str = "log";

/// Date component of a rotated log filename (`<app>-<date>.log`).
pub const LOG_FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Time component appended when a size rotation splits a single day
/// (`<app>-<date>-<time>.log`).
pub const LOG_FILE_TIME_FORMAT: &str = "%H%M%S";

// =============================================================================
// Viewer defaults
// =============================================================================

/// Default viewer redraw interval in milliseconds ("normal" speed).
pub const REDRAW_INTERVAL_NORMAL_MS: u64 = 250;

/// "Slow" viewer redraw interval in milliseconds.
pub const REDRAW_INTERVAL_SLOW_MS: u64 = 1_000;

/// "Fast" viewer redraw interval in milliseconds.
pub const REDRAW_INTERVAL_FAST_MS: u64 = 50;

/// Minimum user-configurable redraw interval (ms).
pub const MIN_REDRAW_INTERVAL_MS: u64 = 16;

/// Maximum user-configurable redraw interval (ms).
pub const MAX_REDRAW_INTERVAL_MS: u64 = 10_000;

// =============================================================================
// Toast defaults
// =============================================================================

/// How long a toast stays on screen before auto-dismissing (ms).
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3_000;

/// Maximum number of toasts stacked on screen at once. Older toasts are
/// dismissed early when the stack is full.
pub const MAX_VISIBLE_TOASTS: usize = 5;

/// Margin between the screen edge and the toast stack, in points.
pub const TOAST_MARGIN: f32 = 16.0;

/// Vertical spacing between stacked toasts, in points.
pub const TOAST_SPACING: f32 = 8.0;

/// Maximum toast width in points; longer messages wrap.
pub const TOAST_WIDTH: f32 = 320.0;

// =============================================================================
// Viewer layout
// =============================================================================

/// Height of one viewer row in points.
pub const ROW_HEIGHT: f32 = 20.0;

/// Width of the command-runner side panel in points.
pub const COMMAND_PANEL_WIDTH: f32 = 260.0;

/// Initial window size in points.
pub const WINDOW_SIZE: [f32; 2] = [900.0, 600.0];

/// Minimum window size in points.
pub const MIN_WINDOW_SIZE: [f32; 2] = [520.0, 320.0];

// =============================================================================
// Internal diagnostics
// =============================================================================

/// Default level for the crate's own tracing diagnostics.
pub const DEFAULT_DIAG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name, looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

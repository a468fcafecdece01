// Unilog - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no UI
// dependencies; these types are the shared vocabulary across all layers.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

use crate::util::error::ConfigError;

// =============================================================================
// Severity
// =============================================================================

/// Ordinal log severity, ordered least to most severe so that
/// `entry.severity >= sink.min_level` expresses sink admission directly.
///
/// This replaces the original design's dynamic name-to-handler dispatch with
/// an explicit enum-keyed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Returns all variants in ascending severity order.
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ]
    }

    /// Canonical uppercase label, as rendered into the `{level}` placeholder.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// Short label for compact display (viewer rows).
    pub fn short_label(&self) -> &'static str {
        match self {
            Severity::Debug => "DBG",
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERR",
            Severity::Critical => "CRIT",
        }
    }

    /// Parse a configured level name. Case-insensitive; anything outside the
    /// five canonical names is a fatal configuration error.
    pub fn parse(value: &str) -> Result<Severity, ConfigError> {
        match value.to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" => Ok(Severity::Critical),
            _ => Err(ConfigError::InvalidLevel {
                value: value.to_string(),
            }),
        }
    }

    /// Severity for a display keyword.
    ///
    /// Keywords that name a severity map to it; every other keyword
    /// ("success", "system", "user", "network", "security", or anything
    /// unrecognised) logs at Info, keeping its own presentation. This is the
    /// explicit-table rendition of the original's getattr-with-info-fallback.
    pub fn from_keyword(keyword: &str) -> Severity {
        match keyword.to_lowercase().as_str() {
            "debug" => Severity::Debug,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            "critical" => Severity::Critical,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Visual style identifier attached to an entry or toast.
///
/// The names follow the bootstrap-style vocabulary used by the classifier
/// table ("danger", "warning", "info", "success", "primary").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Danger,
    Warning,
    Info,
    Success,
    Primary,
}

impl Style {
    /// Stable string id for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Danger => "danger",
            Style::Warning => "warning",
            Style::Info => "info",
            Style::Success => "success",
            Style::Primary => "primary",
        }
    }
}

/// How an entry is presented in the viewer and in toasts: an icon id from
/// the classifier table plus a visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    /// Icon identifier (e.g. "times-circle", "comment").
    pub icon: &'static str,

    /// Visual style identifier.
    pub style: Style,
}

// =============================================================================
// Log entry
// =============================================================================

/// A single emitted log event. Immutable once created: the facade builds one
/// per `display`/`log_exception`/`custom_traceback` call, the sinks format
/// it, and the viewer buffer owns it afterwards.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Monotonically increasing unique ID within the facade's lifetime.
    pub id: u64,

    /// Local wall-clock time at emission.
    pub timestamp: DateTime<Local>,

    /// Normalised severity driving sink admission.
    pub severity: Severity,

    /// The level/keyword string the caller passed (drives presentation).
    pub keyword: String,

    /// Message text.
    pub message: String,

    /// Icon/style pair resolved by the classifier at creation time.
    pub presentation: Presentation,
}

// =============================================================================
// Toast
// =============================================================================

/// A transient GUI notification. Fire-and-forget: the caller observes no
/// return value, the viewer dismisses it after `duration`.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Message text shown in the toast body.
    pub message: String,

    /// Icon/style pair for the toast accent.
    pub presentation: Presentation,

    /// How long the toast stays on screen.
    pub duration: Duration,

    /// When the toast was raised.
    pub raised_at: Instant,
}

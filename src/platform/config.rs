// Unilog - platform/config.rs
//
// Platform path resolution and optional config.toml loading with startup
// validation. Uses the `directories` crate for XDG (Linux), AppData
// (Windows), and Library (macOS) compliance.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::util::constants;
use crate::util::error::ConfigError;

/// Resolved platform paths for Unilog configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/unilog/ or %APPDATA%\Unilog\).
    pub config_dir: PathBuf,

    /// Data directory, the default parent for log folders.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a config file written for a newer version
/// still loads on an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[ui]` section.
    pub ui: UiSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Minimum log level name.
    pub level: Option<String>,
    /// Log folder path.
    pub folder: Option<String>,
    /// Record template.
    pub format: Option<String>,
    /// Internal diagnostics level (tracing filter).
    pub diagnostics: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Interfaces to activate: "cli", "gui", or "cli,gui".
    pub interfaces: Option<String>,
    /// Viewer redraw interval in milliseconds.
    pub redraw_interval_ms: Option<u64>,
    /// Toast display duration in milliseconds.
    pub toast_duration_ms: Option<u64>,
    /// Dark theme on startup.
    pub dark_mode: Option<bool>,
}

/// Load and validate config.toml. A missing file is not an error: defaults
/// apply. A present-but-invalid file is fatal at startup.
pub fn load_config(path: &Path) -> Result<RawConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(RawConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let raw: RawConfig = toml::from_str(&text).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(&raw)?;
    tracing::info!(path = %path.display(), "Config loaded");
    Ok(raw)
}

fn validate(raw: &RawConfig) -> Result<(), ConfigError> {
    if let Some(ms) = raw.ui.redraw_interval_ms {
        if !(constants::MIN_REDRAW_INTERVAL_MS..=constants::MAX_REDRAW_INTERVAL_MS).contains(&ms) {
            return Err(ConfigError::ValueOutOfRange {
                field: "ui.redraw_interval_ms",
                value: ms.to_string(),
                expected: "16..=10000",
            });
        }
    }
    if let Some(ms) = raw.ui.toast_duration_ms {
        if ms == 0 {
            return Err(ConfigError::ValueOutOfRange {
                field: "ui.toast_duration_ms",
                value: ms.to_string(),
                expected: "a positive duration",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let raw = load_config(Path::new("/nonexistent/unilog-config.toml")).unwrap();
        assert!(raw.logging.level.is_none());
        assert!(raw.ui.interfaces.is_none());
    }

    #[test]
    fn sections_parse_and_unknown_keys_are_ignored() {
        let (_dir, path) = write_config(
            r#"
            future_section = { answer = 42 }

            [logging]
            level = "ERROR"
            folder = "/var/log/myapp"
            format = "{message}"
            unknown_key = true

            [ui]
            interfaces = "gui"
            redraw_interval_ms = 500
            "#,
        );

        let raw = load_config(&path).unwrap();
        assert_eq!(raw.logging.level.as_deref(), Some("ERROR"));
        assert_eq!(raw.logging.folder.as_deref(), Some("/var/log/myapp"));
        assert_eq!(raw.ui.interfaces.as_deref(), Some("gui"));
        assert_eq!(raw.ui.redraw_interval_ms, Some(500));
    }

    #[test]
    fn malformed_toml_is_fatal() {
        let (_dir, path) = write_config("[logging\nlevel = ");
        let result = load_config(&path);
        assert!(
            matches!(result, Err(ConfigError::TomlParse { .. })),
            "expected TomlParse, got {result:?}"
        );
    }

    #[test]
    fn out_of_range_redraw_interval_is_fatal() {
        let (_dir, path) = write_config("[ui]\nredraw_interval_ms = 1\n");
        let result = load_config(&path);
        assert!(
            matches!(result, Err(ConfigError::ValueOutOfRange { .. })),
            "expected ValueOutOfRange, got {result:?}"
        );
    }
}

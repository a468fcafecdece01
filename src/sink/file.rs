// Unilog - sink/file.rs
//
// Append-only file target with rotation.
//
// Validation happens at creation: a log folder that cannot be created or a
// file that cannot be opened for appending is a fatal configuration error
// reported immediately, never deferred to the first emit.

use chrono::{DateTime, Local, NaiveDate};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::util::constants::{LOG_FILE_DATE_FORMAT, LOG_FILE_EXT, LOG_FILE_TIME_FORMAT};
use crate::util::error::ConfigError;

// =============================================================================
// Rotation policy
// =============================================================================

/// When a file sink starts a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Start a new dated file when the local date changes. The default.
    Daily,

    /// Start a new file when the current one would exceed this many bytes.
    MaxSize(u64),

    /// Never rotate.
    Never,
}

// =============================================================================
// File sink
// =============================================================================

/// An open, append-only log file that rotates per its policy.
#[derive(Debug)]
pub struct FileSink {
    folder: PathBuf,
    app_name: String,
    policy: RotationPolicy,
    path: PathBuf,
    file: File,
    opened_on: NaiveDate,
    bytes_written: u64,
}

impl FileSink {
    /// Create the log folder (if needed) and open the current dated file.
    pub fn create(
        folder: &Path,
        app_name: &str,
        policy: RotationPolicy,
    ) -> Result<Self, ConfigError> {
        std::fs::create_dir_all(folder).map_err(|e| ConfigError::LogFolder {
            path: folder.to_path_buf(),
            source: e,
        })?;

        let now = Local::now();
        let path = dated_path(folder, app_name, &now, false);
        let file = open_append(&path)?;
        let bytes_written = file.metadata().map(|m| m.len()).unwrap_or(0);

        tracing::debug!(path = %path.display(), ?policy, "File sink opened");

        Ok(Self {
            folder: folder.to_path_buf(),
            app_name: app_name.to_string(),
            policy,
            path,
            file,
            opened_on: now.date_naive(),
            bytes_written,
        })
    }

    /// Re-open this sink with the same folder, name, and policy. Used when
    /// the registry is rebuilt on a level or format change.
    pub fn reopen(&self) -> Result<Self, ConfigError> {
        Self::create(&self.folder, &self.app_name, self.policy)
    }

    /// Path of the file currently being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, rotating first if the policy requires it.
    pub fn write_line(&mut self, line: &str, now: DateTime<Local>) -> io::Result<()> {
        if self.rotation_due(now, line.len() as u64 + 1) {
            self.rotate(now)?;
        }
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.bytes_written += line.len() as u64 + 1;
        Ok(())
    }

    fn rotation_due(&self, now: DateTime<Local>, incoming: u64) -> bool {
        match self.policy {
            RotationPolicy::Daily => now.date_naive() != self.opened_on,
            RotationPolicy::MaxSize(max) => {
                self.bytes_written > 0 && self.bytes_written + incoming > max
            }
            RotationPolicy::Never => false,
        }
    }

    fn rotate(&mut self, now: DateTime<Local>) -> io::Result<()> {
        // Size rotation within one day needs a time component to avoid
        // re-opening the file just written full.
        let timestamped = matches!(self.policy, RotationPolicy::MaxSize(_))
            && now.date_naive() == self.opened_on;
        let path = dated_path(&self.folder, &self.app_name, &now, timestamped);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::info!(
            from = %self.path.display(),
            to = %path.display(),
            "Log file rotated"
        );

        self.file = file;
        self.path = path;
        self.opened_on = now.date_naive();
        self.bytes_written = 0;
        Ok(())
    }
}

/// `<folder>/<app>-<date>.log`, or `<folder>/<app>-<date>-<time>.log` when a
/// size rotation splits a single day.
fn dated_path(folder: &Path, app_name: &str, now: &DateTime<Local>, timestamped: bool) -> PathBuf {
    let date = now.format(LOG_FILE_DATE_FORMAT);
    let name = if timestamped {
        let time = now.format(LOG_FILE_TIME_FORMAT);
        format!("{app_name}-{date}-{time}.{LOG_FILE_EXT}")
    } else {
        format!("{app_name}-{date}.{LOG_FILE_EXT}")
    };
    folder.join(name)
}

fn open_append(path: &Path) -> Result<File, ConfigError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ConfigError::SinkTarget {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn create_opens_dated_file_in_new_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("logs");

        let sink = FileSink::create(&folder, "testapp", RotationPolicy::Daily).unwrap();

        let expected = format!(
            "testapp-{}.log",
            Local::now().format(LOG_FILE_DATE_FORMAT)
        );
        assert_eq!(sink.path().file_name().unwrap().to_str().unwrap(), expected);
        assert!(folder.is_dir());
    }

    #[test]
    fn create_fails_when_folder_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the folder should go.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"x").unwrap();

        let result = FileSink::create(&blocker.join("logs"), "testapp", RotationPolicy::Daily);
        assert!(
            matches!(result, Err(ConfigError::LogFolder { .. })),
            "expected LogFolder error, got {result:?}"
        );
    }

    #[test]
    fn write_line_appends_records_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::create(dir.path(), "testapp", RotationPolicy::Never).unwrap();

        sink.write_line("first", Local::now()).unwrap();
        sink.write_line("second", Local::now()).unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn daily_rotation_switches_file_on_date_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::create(dir.path(), "testapp", RotationPolicy::Daily).unwrap();

        // Rewind the sink to a state as if it had been opened yesterday.
        let yesterday = Local::now() - ChronoDuration::days(1);
        sink.path = dated_path(dir.path(), "testapp", &yesterday, false);
        sink.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&sink.path)
            .unwrap();
        sink.opened_on = yesterday.date_naive();

        sink.write_line("yesterday's entry", yesterday).unwrap();
        let old_path = sink.path().to_path_buf();

        sink.write_line("today's entry", Local::now()).unwrap();
        assert_ne!(sink.path(), old_path, "rotation should switch files");
        assert_eq!(
            std::fs::read_to_string(&old_path).unwrap(),
            "yesterday's entry\n"
        );
        assert_eq!(
            std::fs::read_to_string(sink.path()).unwrap(),
            "today's entry\n"
        );
    }

    #[test]
    fn size_rotation_starts_new_file_at_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink =
            FileSink::create(dir.path(), "testapp", RotationPolicy::MaxSize(32)).unwrap();

        sink.write_line("0123456789012345678901234567890", Local::now())
            .unwrap(); // 32 bytes with newline, fills the file
        let first = sink.path().to_path_buf();

        sink.write_line("next", Local::now()).unwrap();
        assert_ne!(sink.path(), first, "size rotation should switch files");
        assert_eq!(std::fs::read_to_string(sink.path()).unwrap(), "next\n");
    }

    #[test]
    fn never_policy_keeps_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::create(dir.path(), "testapp", RotationPolicy::Never).unwrap();
        let path = sink.path().to_path_buf();

        for i in 0..50 {
            sink.write_line(&format!("entry {i}"), Local::now()).unwrap();
        }
        assert_eq!(sink.path(), path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().lines().count(),
            50
        );
    }
}

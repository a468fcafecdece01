// Unilog - sink/registry.rs
//
// The sink registry: named output destinations, each with its own minimum
// severity and record template. `emit` fans a log entry out to every sink
// whose threshold admits it, exactly once per sink.
//
// Level and format changes never mutate sinks in place: the registry is
// drained and every sink is re-registered with the new settings. The facade
// is a single writer, so a rebuild can never interleave with an emit.

use std::fmt;
use std::io::{self, Write};

use crate::core::model::{LogEntry, Severity};
use crate::sink::file::FileSink;
use crate::util::constants::TIME_FORMAT;
use crate::util::error::{ConfigError, SinkError};

// =============================================================================
// Targets and handles
// =============================================================================

/// A fallible line consumer used for custom sink targets.
pub type SinkCallback = Box<dyn FnMut(&str) -> io::Result<()> + Send>;

/// Where a sink delivers its formatted records.
pub enum SinkTarget {
    /// Rotating log file.
    File(FileSink),

    /// Standard error stream.
    Stderr,

    /// Caller-supplied callback.
    Callback(SinkCallback),
}

impl fmt::Debug for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(sink) => f.debug_tuple("File").field(&sink.path()).finish(),
            Self::Stderr => f.write_str("Stderr"),
            Self::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Opaque identifier for a registered sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkHandle(u64);

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug)]
struct Sink {
    handle: SinkHandle,
    label: String,
    min_level: Severity,
    template: String,
    /// The primary sink is the facade's main log file; a write failure there
    /// is fatal to the emit. Secondary sinks are disabled on failure instead.
    primary: bool,
    enabled: bool,
    target: SinkTarget,
}

/// Owns every registered sink. Held by the facade's `LoggerContext`; there
/// is no global registry.
#[derive(Debug, Default)]
pub struct SinkRegistry {
    sinks: Vec<Sink>,
    next_handle: u64,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink. File targets have already been validated by
    /// [`FileSink::create`]; registration itself cannot fail.
    pub fn register(
        &mut self,
        target: SinkTarget,
        min_level: Severity,
        template: &str,
        primary: bool,
    ) -> SinkHandle {
        let handle = SinkHandle(self.next_handle);
        self.next_handle += 1;

        let label = match &target {
            SinkTarget::File(sink) => format!("file:{}", sink.path().display()),
            SinkTarget::Stderr => "stderr".to_string(),
            SinkTarget::Callback(_) => format!("callback#{}", handle.0),
        };

        tracing::debug!(sink = %label, level = %min_level, "Sink registered");

        self.sinks.push(Sink {
            handle,
            label,
            min_level,
            template: template.to_string(),
            primary,
            enabled: true,
            target,
        });
        handle
    }

    /// Remove a sink. Returns false when the handle is unknown (already
    /// removed, or from a previous rebuild generation).
    pub fn remove(&mut self, handle: SinkHandle) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|s| s.handle != handle);
        before != self.sinks.len()
    }

    /// Number of registered sinks (enabled or not).
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Forward an entry to every enabled sink whose minimum level admits it.
    ///
    /// A write failure on a secondary sink disables that sink and reports
    /// the failure through the remaining ones; a failure on the primary sink
    /// is returned to the caller.
    pub fn emit(&mut self, entry: &LogEntry) -> Result<(), SinkError> {
        let mut disabled: Vec<(String, io::Error)> = Vec::new();

        for sink in &mut self.sinks {
            if !sink.enabled || entry.severity < sink.min_level {
                continue;
            }
            let line = render_template(&sink.template, entry);
            if let Err(e) = write_target(&mut sink.target, &line, entry) {
                if sink.primary {
                    return Err(SinkError::Write {
                        sink: sink.label.clone(),
                        source: e,
                    });
                }
                tracing::warn!(sink = %sink.label, error = %e, "Sink disabled after write failure");
                sink.enabled = false;
                disabled.push((sink.label.clone(), e));
            }
        }

        // Report each disabled sink through whatever still works. Best
        // effort: a failure while reporting is only traced, not recursed on.
        for (label, err) in disabled {
            let notice = format!("Sink '{label}' disabled after write failure: {err}");
            for sink in &mut self.sinks {
                if !sink.enabled || sink.min_level > Severity::Error {
                    continue;
                }
                let line = sink
                    .template
                    .replace("{time}", &entry.timestamp.format(TIME_FORMAT).to_string())
                    .replace("{level}", Severity::Error.label())
                    .replace("{message}", &notice);
                if let Err(e) = write_target(&mut sink.target, &line, entry) {
                    tracing::warn!(sink = %sink.label, error = %e, "Failed to report sink failure");
                }
            }
        }

        Ok(())
    }

    /// Swap the primary sink's file target, e.g. after a log-folder change.
    /// The replacement file has already been validated by `FileSink::create`.
    pub fn replace_primary_file(&mut self, file: FileSink) {
        for sink in &mut self.sinks {
            if sink.primary {
                sink.label = format!("file:{}", file.path().display());
                sink.target = SinkTarget::File(file);
                sink.enabled = true;
                tracing::debug!(sink = %sink.label, "Primary sink replaced");
                return;
            }
        }
    }

    /// Re-register every sink with a new minimum level. File targets are
    /// re-opened, exactly as if they had been registered afresh.
    pub fn rebuild_with_level(&mut self, min_level: Severity) -> Result<(), ConfigError> {
        self.rebuild(|sink| sink.min_level = min_level)
    }

    /// Re-register every sink with a new record template.
    pub fn rebuild_with_template(&mut self, template: &str) -> Result<(), ConfigError> {
        self.rebuild(|sink| sink.template = template.to_string())
    }

    fn rebuild<F: Fn(&mut Sink)>(&mut self, apply: F) -> Result<(), ConfigError> {
        // Re-open every file target first so a failed reopen leaves the
        // registry untouched; the swap below cannot fail.
        let mut reopened: Vec<Option<FileSink>> = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            reopened.push(match &sink.target {
                SinkTarget::File(file) => Some(file.reopen()?),
                _ => None,
            });
        }

        for (sink, replacement) in self.sinks.iter_mut().zip(reopened) {
            if let Some(file) = replacement {
                sink.target = SinkTarget::File(file);
            }
            sink.enabled = true;
            apply(sink);
        }

        tracing::debug!(sinks = self.sinks.len(), "Sink registry rebuilt");
        Ok(())
    }
}

fn write_target(target: &mut SinkTarget, line: &str, entry: &LogEntry) -> io::Result<()> {
    match target {
        SinkTarget::File(sink) => sink.write_line(line, entry.timestamp),
        SinkTarget::Stderr => {
            let mut stderr = io::stderr().lock();
            stderr.write_all(line.as_bytes())?;
            stderr.write_all(b"\n")
        }
        SinkTarget::Callback(cb) => cb(line),
    }
}

/// Render a record from a template by substituting `{time}`, `{level}`, and
/// `{message}`.
pub fn render_template(template: &str, entry: &LogEntry) -> String {
    template
        .replace("{time}", &entry.timestamp.format(TIME_FORMAT).to_string())
        .replace("{level}", entry.severity.label())
        .replace("{message}", &entry.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify;
    use std::sync::{Arc, Mutex};

    fn make_entry(severity: Severity, message: &str) -> LogEntry {
        LogEntry {
            id: 0,
            timestamp: chrono::Local::now(),
            severity,
            keyword: severity.label().to_lowercase(),
            message: message.to_string(),
            presentation: classify::classify(&severity.label().to_lowercase()),
        }
    }

    /// Callback target that records every line it receives.
    fn capture() -> (SinkTarget, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::clone(&lines);
        let target = SinkTarget::Callback(Box::new(move |line: &str| {
            writer.lock().unwrap().push(line.to_string());
            Ok(())
        }));
        (target, lines)
    }

    /// Callback target that always fails.
    fn broken() -> SinkTarget {
        SinkTarget::Callback(Box::new(|_| {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }))
    }

    #[test]
    fn emit_respects_min_level() {
        let mut registry = SinkRegistry::new();
        assert!(registry.is_empty());
        let (target, lines) = capture();
        registry.register(target, Severity::Warning, "{message}", true);

        registry.emit(&make_entry(Severity::Info, "below")).unwrap();
        registry
            .emit(&make_entry(Severity::Warning, "at threshold"))
            .unwrap();
        registry.emit(&make_entry(Severity::Error, "above")).unwrap();

        let captured = lines.lock().unwrap();
        assert_eq!(*captured, vec!["at threshold", "above"]);
    }

    #[test]
    fn emit_delivers_to_every_eligible_sink_exactly_once() {
        let mut registry = SinkRegistry::new();
        let (a, lines_a) = capture();
        let (b, lines_b) = capture();
        registry.register(a, Severity::Debug, "{message}", true);
        registry.register(b, Severity::Error, "{message}", false);

        registry.emit(&make_entry(Severity::Error, "boom")).unwrap();

        assert_eq!(*lines_a.lock().unwrap(), vec!["boom"]);
        assert_eq!(*lines_b.lock().unwrap(), vec!["boom"]);
    }

    #[test]
    fn rebuild_with_level_refilters_subsequent_emits() {
        let mut registry = SinkRegistry::new();
        let (target, lines) = capture();
        registry.register(target, Severity::Debug, "{message}", true);

        registry.emit(&make_entry(Severity::Debug, "kept")).unwrap();
        registry.rebuild_with_level(Severity::Error).unwrap();
        registry
            .emit(&make_entry(Severity::Debug, "dropped"))
            .unwrap();
        registry
            .emit(&make_entry(Severity::Critical, "kept too"))
            .unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["kept", "kept too"]);
    }

    #[test]
    fn rebuild_with_template_changes_record_shape() {
        let mut registry = SinkRegistry::new();
        let (target, lines) = capture();
        registry.register(target, Severity::Debug, "{message}", true);

        registry.emit(&make_entry(Severity::Info, "one")).unwrap();
        registry.rebuild_with_template("[{level}] {message}").unwrap();
        registry.emit(&make_entry(Severity::Info, "two")).unwrap();

        assert_eq!(*lines.lock().unwrap(), vec!["one", "[INFO] two"]);
    }

    #[test]
    fn secondary_sink_failure_disables_it_and_reports_to_remaining() {
        let mut registry = SinkRegistry::new();
        let (primary, lines) = capture();
        registry.register(primary, Severity::Debug, "{message}", true);
        registry.register(broken(), Severity::Debug, "{message}", false);

        registry.emit(&make_entry(Severity::Info, "first")).unwrap();

        let captured = lines.lock().unwrap();
        assert_eq!(captured[0], "first");
        assert!(
            captured[1].contains("disabled after write failure"),
            "expected failure report, got {captured:?}"
        );
        drop(captured);

        // The broken sink stays disabled: no further errors, no reports.
        registry.emit(&make_entry(Severity::Info, "second")).unwrap();
        let captured = lines.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[2], "second");
    }

    #[test]
    fn primary_sink_failure_is_fatal() {
        let mut registry = SinkRegistry::new();
        registry.register(broken(), Severity::Debug, "{message}", true);

        let result = registry.emit(&make_entry(Severity::Info, "boom"));
        assert!(
            matches!(result, Err(SinkError::Write { .. })),
            "expected Write error, got {result:?}"
        );
    }

    #[test]
    fn removed_sink_receives_nothing() {
        let mut registry = SinkRegistry::new();
        let (a, lines_a) = capture();
        let (b, lines_b) = capture();
        let _keep = registry.register(a, Severity::Debug, "{message}", true);
        let gone = registry.register(b, Severity::Debug, "{message}", false);

        assert!(registry.remove(gone));
        assert!(!registry.remove(gone), "double remove reports false");

        registry.emit(&make_entry(Severity::Info, "hello")).unwrap();
        assert_eq!(*lines_a.lock().unwrap(), vec!["hello"]);
        assert!(lines_b.lock().unwrap().is_empty());
    }

    #[test]
    fn render_template_substitutes_all_placeholders() {
        let entry = make_entry(Severity::Error, "it broke");
        let line = render_template("{time} [{level}] {message}", &entry);
        assert!(line.ends_with("[ERROR] it broke"), "got: {line}");
        assert!(!line.contains('{'), "unsubstituted placeholder in: {line}");
    }
}

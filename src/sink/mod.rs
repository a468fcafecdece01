// Unilog - sink/mod.rs
//
// Log sink adapter: file, stream, and callback destinations with per-sink
// severity thresholds and format templates.

pub mod file;
pub mod registry;

pub use file::{FileSink, RotationPolicy};
pub use registry::{render_template, SinkCallback, SinkHandle, SinkRegistry, SinkTarget};

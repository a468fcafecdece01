// Unilog - util/mod.rs
//
// Utility modules: error types, named constants, internal diagnostics.
// No dependencies on core, sink, cli, app, or ui layers.

pub mod constants;
pub mod error;
pub mod logging;

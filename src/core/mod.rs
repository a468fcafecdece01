// Unilog - core/mod.rs
//
// Core layer: data model, level classifier, and the viewer buffer.
// Pure logic; no filesystem, no clap, no egui.

pub mod buffer;
pub mod classify;
pub mod model;

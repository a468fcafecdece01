// Unilog - ui/mod.rs
//
// egui layer: theme, toasts, command runner, and the viewer application.

pub mod commands;
pub mod theme;
pub mod toast;
pub mod viewer;

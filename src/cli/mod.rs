// Unilog - cli/mod.rs
//
// Command registry and the generated clap surface, plus CLI progress
// rendering.

pub mod progress;
pub mod registry;
pub mod surface;

pub use registry::{
    ArgValue, CommandArgs, CommandHandler, CommandRegistry, CommandSpec, HandlerError, ParamKind,
    ParamSpec,
};
pub use surface::GlobalOpts;

//! Command-line interface.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    CanInstallArgs, Cli, Commands, CompletionsArgs, DetectArgs, HistoryArgs, InstallArgs,
    ModeArgs, ResolveArgs, StatusArgs,
};
pub use commands::{Command, CommandDispatcher, CommandResult};

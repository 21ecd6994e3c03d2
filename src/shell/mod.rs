//! Process execution and host platform probes.

pub mod command;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult, Invocation};
pub use platform::{
    is_elevated, is_executable, is_interactive_terminal, parse_system_path, resolve_executable,
};

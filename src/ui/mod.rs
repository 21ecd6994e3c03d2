//! Terminal output and prompts for the CLI.
//!
//! - [`UserInterface`] trait so commands can be tested with [`MockUI`]
//! - [`TerminalUI`] for real terminals
//! - [`DetectionProgress`] for batch detection

pub mod mock;
pub mod output;
pub mod progress;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use progress::DetectionProgress;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, ToolsenseTheme};

use crate::error::Result;

/// User-facing output and confirmation.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Print a plain line. Suppressed in quiet mode.
    fn message(&mut self, msg: &str);

    /// Print data the user explicitly asked for. Never suppressed.
    fn data(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    /// Errors are always shown.
    fn error(&mut self, msg: &str);

    fn show_header(&mut self, title: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    fn is_interactive(&self) -> bool;

    fn theme(&self) -> &ToolsenseTheme;
}

//! Command dispatching.
//!
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting through `ui`.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    settings: Settings,
    toolbox: Option<Toolbox>,
}

impl CommandDispatcher {
    /// The toolbox is opened lazily from `settings` on first use.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            toolbox: None,
        }
    }

    /// Dispatch against an already-built toolbox.
    pub fn with_toolbox(toolbox: Toolbox) -> Self {
        Self {
            settings: toolbox.settings().clone(),
            toolbox: Some(toolbox),
        }
    }

    fn toolbox(&mut self) -> Result<&Toolbox> {
        let toolbox = match self.toolbox.take() {
            Some(toolbox) => toolbox,
            None => Toolbox::open(self.settings.clone())?,
        };
        Ok(self.toolbox.insert(toolbox))
    }

    /// Route the CLI subcommand to its implementation and run it.
    pub fn dispatch(&mut self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Commands::Completions(args) = &cli.command {
            return super::completions::CompletionsCommand::new(args.clone()).execute(ui);
        }

        let toolbox = self.toolbox()?;
        match &cli.command {
            Commands::Status(args) => {
                super::status::StatusCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::Detect(args) => {
                super::detect::DetectCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::Install(args) => {
                super::install::InstallCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::CanInstall(args) => {
                super::can_install::CanInstallCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::Resolve(args) => {
                super::resolve::ResolveCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::Mode(args) => {
                super::mode::ModeCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::History(args) => {
                super::history::HistoryCommand::new(toolbox, args.clone()).execute(ui)
            }
            Commands::Completions(_) => Ok(CommandResult::success()),
        }
    }
}

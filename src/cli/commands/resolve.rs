//! Resolve command implementation.
//!
//! `toolsense resolve <CAPABILITY>` lists tools that provide a capability
//! right now, or the fallback that stands in for them.

use crate::cli::args::ResolveArgs;
use crate::error::Result;
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand<'a> {
    toolbox: &'a Toolbox,
    args: ResolveArgs,
}

impl<'a> ResolveCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: ResolveArgs) -> Self {
        Self { toolbox, args }
    }
}

impl Command for ResolveCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let capability = self.args.capability.as_str();
        let report = self.toolbox.refresh_stale()?;
        for (tool, err) in &report.failures {
            tracing::warn!("Could not detect '{}': {}", tool, err);
        }
        let tools = self.toolbox.resolve(capability);

        if !tools.is_empty() {
            for tool in tools {
                ui.data(&format!("{} (priority {})", tool.name, tool.priority));
            }
            return Ok(CommandResult::success());
        }

        match self.toolbox.backend_for(capability) {
            Some(backend) => {
                ui.warning(&format!("No installed tool provides {}", capability));
                ui.data(&backend.id());
                Ok(CommandResult::success())
            }
            None => {
                let known = self.toolbox.registry().capabilities().contains(capability);
                if known {
                    ui.error(&format!("No installed tool provides {}", capability));
                } else {
                    ui.error(&format!("Unknown capability '{}'", capability));
                }
                Ok(CommandResult::failure(1))
            }
        }
    }
}

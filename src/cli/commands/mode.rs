//! Mode command implementation.
//!
//! `toolsense mode` shows the degradation mode and active fallbacks.

use crate::cli::args::ModeArgs;
use crate::error::Result;
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The mode command implementation.
pub struct ModeCommand<'a> {
    toolbox: &'a Toolbox,
    args: ModeArgs,
}

impl<'a> ModeCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: ModeArgs) -> Self {
        Self { toolbox, args }
    }
}

impl Command for ModeCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let report = self.toolbox.refresh_stale()?;
        for (tool, err) in &report.failures {
            tracing::warn!("Could not detect '{}': {}", tool, err);
        }
        let state = self.toolbox.degradation_state();

        if self.args.json {
            let json = serde_json::to_string_pretty(&state).map_err(anyhow::Error::from)?;
            ui.data(&json);
            return Ok(CommandResult::success());
        }

        let line = format!(
            "Mode: {} - {}",
            ui.theme().format_mode(state.mode),
            state.mode.description()
        );
        ui.data(&line);
        ui.message(&format!("  Core tools:     {}", state.core));
        ui.message(&format!("  Enhanced tools: {}", state.enhanced));

        if !state.missing.is_empty() {
            ui.message("  Missing capabilities:");
            for capability in &state.missing {
                ui.message(&format!("    - {}", capability));
            }
        }
        if !state.active_fallbacks.is_empty() {
            let fallbacks: Vec<&str> = state.active_fallbacks.iter().map(String::as_str).collect();
            ui.message(&format!("  Active fallbacks: {}", fallbacks.join(", ")));
        }
        Ok(CommandResult::success())
    }
}

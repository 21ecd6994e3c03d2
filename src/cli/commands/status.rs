//! Status command implementation.
//!
//! `toolsense status` refreshes stale entries and lists every known tool.

use console::{pad_str, Alignment};

use crate::cache::ToolStatus;
use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::registry::Category;
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand<'a> {
    toolbox: &'a Toolbox,
    args: StatusArgs,
}

impl<'a> StatusCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: StatusArgs) -> Self {
        Self { toolbox, args }
    }

    /// Current statuses in registry order, refreshing stale entries first.
    fn statuses(&self) -> Result<Vec<ToolStatus>> {
        let report = self.toolbox.refresh_stale()?;
        for (tool, err) in &report.failures {
            tracing::warn!("Could not detect '{}': {}", tool, err);
        }
        let snapshot = self.toolbox.cache().snapshot();
        Ok(self
            .toolbox
            .registry()
            .iter()
            .filter_map(|tool| snapshot.get(&tool.name).cloned())
            .collect())
    }

    fn format_line(ui: &dyn UserInterface, status: &ToolStatus) -> String {
        let theme = ui.theme();
        let version = status
            .version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let method = status.method.map(|m| m.as_str()).unwrap_or("-");
        format!(
            "  {} {} {} {}",
            pad_str(&theme.highlight.apply_to(&status.tool).to_string(), 16, Alignment::Left, None),
            pad_str(&theme.format_status(status.status), 16, Alignment::Left, None),
            pad_str(&version, 10, Alignment::Left, None),
            theme.dim.apply_to(method)
        )
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let statuses = self.statuses()?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&statuses)
                .map_err(|e| anyhow::anyhow!("Failed to serialize statuses: {}", e))?;
            ui.data(&json);
            return Ok(CommandResult::success());
        }

        for category in Category::ALL {
            let rows: Vec<&ToolStatus> = statuses
                .iter()
                .filter(|s| {
                    self.toolbox
                        .registry()
                        .get(&s.tool)
                        .is_some_and(|t| t.category == category)
                })
                .collect();
            if rows.is_empty() {
                continue;
            }
            ui.show_header(&format!("{} tools", category));
            for status in rows {
                let line = Self::format_line(ui, status);
                ui.message(&line);
            }
        }

        let mode = self.toolbox.degradation_state().mode;
        let line = format!("Mode: {}", ui.theme().format_mode(mode));
        ui.message(&line);
        Ok(CommandResult::success())
    }
}

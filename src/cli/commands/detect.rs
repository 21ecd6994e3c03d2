//! Detect command implementation.
//!
//! `toolsense detect [TOOLS..]` probes tools and refreshes the cache.

use crate::cache::{StatusKind, ToolStatus};
use crate::cli::args::DetectArgs;
use crate::detection::BatchMode;
use crate::error::Result;
use crate::toolbox::Toolbox;
use crate::ui::{DetectionProgress, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The detect command implementation.
pub struct DetectCommand<'a> {
    toolbox: &'a Toolbox,
    args: DetectArgs,
}

impl<'a> DetectCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: DetectArgs) -> Self {
        Self { toolbox, args }
    }

    fn batch_mode(&self) -> BatchMode {
        if self.args.sequential {
            BatchMode::Sequential
        } else if let Some(workers) = self.args.workers {
            BatchMode::from_settings(true, workers.max(1))
        } else {
            self.toolbox.settings().batch_mode()
        }
    }

    fn targets(&self) -> Vec<String> {
        if self.args.tools.is_empty() {
            self.toolbox
                .registry()
                .names()
                .into_iter()
                .map(String::from)
                .collect()
        } else {
            self.args.tools.clone()
        }
    }
}

impl Command for DetectCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let targets = self.targets();
        let mode = self.batch_mode();
        tracing::debug!("Detecting {} tools ({:?})", targets.len(), mode);

        let progress = if ui.output_mode().shows_progress() && ui.is_interactive() {
            DetectionProgress::new(targets.len())
        } else {
            DetectionProgress::hidden()
        };
        let report = self
            .toolbox
            .engine()
            .detect_many(&targets, mode, &mut |status: &ToolStatus| {
                progress.record(status)
            })?;
        progress.finish();

        if ui.output_mode().shows_detail() {
            for status in &report.statuses {
                let version = status
                    .version
                    .map(|v| format!(" {}", v))
                    .unwrap_or_default();
                let line = format!(
                    "  {} {}{}",
                    status.tool,
                    ui.theme().format_status(status.status),
                    version
                );
                ui.message(&line);
            }
        }

        for (tool, err) in &report.failures {
            ui.warning(&format!("{}: {}", tool, err));
        }

        ui.success(&format!(
            "Detected {} tools: {} installed, {} outdated, {} incompatible, {} missing",
            report.statuses.len(),
            report.count(StatusKind::Installed),
            report.count(StatusKind::Outdated),
            report.count(StatusKind::Incompatible),
            report.count(StatusKind::NotInstalled),
        ));

        if report.failures.is_empty() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

//! History command implementation.
//!
//! `toolsense history` shows recent installation attempts.

use crate::cli::args::HistoryArgs;
use crate::error::Result;
use crate::install::{InstallOutcome, InstallationRecord};
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The history command implementation.
pub struct HistoryCommand<'a> {
    toolbox: &'a Toolbox,
    args: HistoryArgs,
}

impl<'a> HistoryCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: HistoryArgs) -> Self {
        Self { toolbox, args }
    }

    fn format_line(record: &InstallationRecord) -> String {
        let status = match record.outcome {
            InstallOutcome::Success => "[ok]",
            InstallOutcome::Failed => "[FAIL]",
            InstallOutcome::Cancelled => "[cancel]",
        };
        format!(
            "{} {} {} via {} ({}) {:.1}s",
            status,
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.tool,
            record.manager,
            record.package,
            record.duration.as_secs_f64()
        )
    }
}

impl Command for HistoryCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let records = self.toolbox.history(self.args.limit)?;
        if records.is_empty() {
            ui.message("No installation history yet");
            return Ok(CommandResult::success());
        }

        for record in &records {
            ui.data(&Self::format_line(record));
            if ui.output_mode().shows_detail() && !record.details.is_empty() {
                ui.message(&format!("    {}", record.details));
            }
        }
        Ok(CommandResult::success())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::commands::test_support;
    use crate::install::PackageManager;
    use crate::ui::MockUI;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn empty_history() {
        let temp = TempDir::new().unwrap();
        let toolbox = test_support::toolbox(&temp);
        let mut ui = MockUI::new();

        HistoryCommand::new(&toolbox, HistoryArgs { limit: 5 })
            .execute(&mut ui)
            .unwrap();
        assert!(ui.has_output("No installation history yet"));
    }

    #[test]
    fn newest_first_with_limit() {
        let temp = TempDir::new().unwrap();
        let toolbox = test_support::toolbox(&temp);
        for (tool, outcome) in [
            ("fd", InstallOutcome::Failed),
            ("bat", InstallOutcome::Success),
            ("ncdu", InstallOutcome::Cancelled),
        ] {
            let record = InstallationRecord::new(
                tool,
                PackageManager::Apt,
                tool,
                outcome,
                Duration::from_millis(1500),
                "",
            );
            toolbox.install_log().append(&record).unwrap();
        }
        let mut ui = MockUI::new();

        HistoryCommand::new(&toolbox, HistoryArgs { limit: 2 })
            .execute(&mut ui)
            .unwrap();

        let lines = ui.data_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[cancel]"));
        assert!(lines[0].contains("ncdu via apt (ncdu) 1.5s"));
        assert!(lines[1].starts_with("[ok]"));
    }
}

//! Install command implementation.
//!
//! `toolsense install <TOOL>` plans the install, asks for confirmation
//! unless `--yes` is given, and runs it.

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::install::{default_context, InstallOutcome, InstallRequest, InstallerContext};
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand<'a> {
    toolbox: &'a Toolbox,
    args: InstallArgs,
    ctx: InstallerContext<'a>,
}

impl<'a> InstallCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: InstallArgs) -> Self {
        Self::with_context(toolbox, args, default_context())
    }

    /// Use injected command execution and host probes.
    pub fn with_context(toolbox: &'a Toolbox, args: InstallArgs, ctx: InstallerContext<'a>) -> Self {
        Self { toolbox, args, ctx }
    }
}

impl Command for InstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let orchestrator = self.toolbox.orchestrator_with(self.ctx);
        let plan = orchestrator.plan(&self.args.tool, self.args.force, self.args.manager)?;

        ui.message(&format!(
            "Installing {} ({}) with {}{}",
            plan.tool,
            plan.package,
            plan.manager,
            if plan.escalated { " via sudo" } else { "" }
        ));
        if ui.output_mode().shows_detail() {
            ui.message(&format!("  $ {}", plan.invocation));
        }

        let confirmed = if self.args.yes {
            true
        } else if ui.is_interactive() {
            ui.confirm(&format!("Install {}?", plan.tool), true)?
        } else {
            ui.warning("No terminal to confirm on; pass --yes to install unattended");
            false
        };

        let request = InstallRequest {
            force: self.args.force,
            skip_confirm: self.args.yes,
            confirmed,
            manager: self.args.manager,
        };
        let record = orchestrator.install(&self.args.tool, request)?;

        match record.outcome {
            InstallOutcome::Success => {
                ui.success(&format!(
                    "Installed {} via {} in {:.1}s",
                    record.tool,
                    record.manager,
                    record.duration.as_secs_f64()
                ));
                Ok(CommandResult::success())
            }
            InstallOutcome::Cancelled => {
                ui.message(&format!("Installation of {} cancelled", record.tool));
                Ok(CommandResult::failure(1))
            }
            InstallOutcome::Failed => {
                ui.error(&format!("Installation of {} failed: {}", record.tool, record.details));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::commands::test_support;
    use crate::error::ToolsenseError;
    use crate::install::{PackageManager, Privilege};
    use crate::shell::{CommandResult as RunResult, Invocation};
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tempfile::TempDir;

    fn ok_result() -> RunResult {
        RunResult {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            combined: String::new(),
            duration: Duration::from_millis(5),
            success: true,
            timed_out: false,
        }
    }

    fn args(tool: &str, yes: bool) -> InstallArgs {
        InstallArgs {
            tool: tool.to_string(),
            force: false,
            yes,
            manager: None,
        }
    }

    #[test]
    fn unattended_install_runs_planned_command() {
        let temp = TempDir::new().unwrap();
        let toolbox = test_support::toolbox(&temp);
        let ran = RefCell::new(Vec::new());
        let run = |inv: &Invocation, _: Duration| -> crate::error::Result<RunResult> {
            ran.borrow_mut().push(inv.to_string());
            Ok(ok_result())
        };
        let present = || BTreeSet::from([PackageManager::Apt]);
        let privilege = || Privilege::Sudo;
        let ctx = InstallerContext {
            run: &run,
            present_managers: &present,
            privilege: &privilege,
        };
        let mut ui = MockUI::new();

        let result = InstallCommand::with_context(&toolbox, args("ncdu", true), ctx)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert!(ui.has_output("Installing ncdu (ncdu) with apt via sudo"));
        assert!(ui.successes()[0].starts_with("Installed ncdu via apt"));
        let ran = ran.borrow();
        assert!(ran[0].starts_with("sudo -n"));
        assert!(ran[0].contains("apt-get install"));
        assert!(ui.questions().is_empty());
    }

    #[test]
    fn declined_confirmation_is_cancelled() {
        let temp = TempDir::new().unwrap();
        let toolbox = test_support::toolbox(&temp);
        let run = |_: &Invocation, _: Duration| -> crate::error::Result<RunResult> {
            panic!("must not run");
        };
        let present = || BTreeSet::from([PackageManager::Apt]);
        let privilege = || Privilege::Root;
        let ctx = InstallerContext {
            run: &run,
            present_managers: &present,
            privilege: &privilege,
        };
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.queue_confirm(false);

        let result = InstallCommand::with_context(&toolbox, args("ncdu", false), ctx)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.questions(), ["Install ncdu?"]);
        let history = toolbox.history(5).unwrap();
        assert_eq!(history[0].outcome, InstallOutcome::Cancelled);
    }

    #[test]
    fn already_installed_is_an_error() {
        let temp = TempDir::new().unwrap();
        let toolbox = test_support::toolbox(&temp);
        let run = |_: &Invocation, _: Duration| -> crate::error::Result<RunResult> { Ok(ok_result()) };
        let present = || BTreeSet::from([PackageManager::Apt]);
        let privilege = || Privilege::Root;
        let ctx = InstallerContext {
            run: &run,
            present_managers: &present,
            privilege: &privilege,
        };
        let mut ui = MockUI::new();

        let err = InstallCommand::with_context(&toolbox, args("fd", true), ctx)
            .execute(&mut ui)
            .unwrap_err();
        assert!(matches!(err, ToolsenseError::AlreadyInstalled { .. }));
    }
}

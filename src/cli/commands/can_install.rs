//! Can-install command implementation.
//!
//! `toolsense can-install <TOOL>` reports whether every install precondition
//! holds, without running anything.

use crate::cli::args::CanInstallArgs;
use crate::error::{Result, ToolsenseError};
use crate::install::{default_context, InstallerContext};
use crate::toolbox::Toolbox;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The can-install command implementation.
pub struct CanInstallCommand<'a> {
    toolbox: &'a Toolbox,
    args: CanInstallArgs,
    ctx: InstallerContext<'a>,
}

impl<'a> CanInstallCommand<'a> {
    pub fn new(toolbox: &'a Toolbox, args: CanInstallArgs) -> Self {
        Self::with_context(toolbox, args, default_context())
    }

    pub fn with_context(
        toolbox: &'a Toolbox,
        args: CanInstallArgs,
        ctx: InstallerContext<'a>,
    ) -> Self {
        Self { toolbox, args, ctx }
    }
}

impl Command for CanInstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.toolbox.orchestrator_with(self.ctx).can_install(&self.args.tool) {
            Ok(plan) => {
                ui.success(&format!(
                    "{} can be installed with {} (package {})",
                    plan.tool, plan.manager, plan.package
                ));
                if ui.output_mode().shows_detail() {
                    ui.message(&format!("  $ {}", plan.invocation));
                }
                Ok(CommandResult::success())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e @ ToolsenseError::ToolNotInRegistry { .. }) => Err(e),
            Err(e) => {
                ui.data(&format!("{} cannot be installed: {}", self.args.tool, e));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::cli::commands::test_support;
    use crate::install::{PackageManager, Privilege};
    use crate::shell::{CommandResult as RunResult, Invocation};
    use crate::ui::MockUI;
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tempfile::TempDir;

    fn check(tool: &str, present: BTreeSet<PackageManager>, privilege: Privilege) -> (Result<CommandResult>, MockUI) {
        let temp = TempDir::new().unwrap();
        let toolbox = test_support::toolbox(&temp);
        let run = |_: &Invocation, _: Duration| -> Result<RunResult> { panic!("must not run") };
        let present_fn = move || present.clone();
        let privilege_fn = move || privilege;
        let ctx = InstallerContext {
            run: &run,
            present_managers: &present_fn,
            privilege: &privilege_fn,
        };
        let mut ui = MockUI::new();
        let args = CanInstallArgs {
            tool: tool.to_string(),
        };
        let result = CanInstallCommand::with_context(&toolbox, args, ctx).execute(&mut ui);
        (result, ui)
    }

    #[test]
    fn missing_tool_with_mapping_can_be_installed() {
        let (result, ui) = check("ncdu", BTreeSet::from([PackageManager::Apt]), Privilege::Root);
        assert!(result.unwrap().success);
        assert!(ui.has_output("ncdu can be installed with apt (package ncdu)"));
    }

    #[test]
    fn installed_tool_cannot_be_installed() {
        let (result, ui) = check("fd", BTreeSet::from([PackageManager::Apt]), Privilege::Root);
        assert_eq!(result.unwrap().exit_code, 1);
        assert!(ui.has_output("already installed"));
    }

    #[test]
    fn unprivileged_system_manager_is_denied() {
        let (result, ui) = check(
            "ncdu",
            BTreeSet::from([PackageManager::Apt]),
            Privilege::Unprivileged,
        );
        assert_eq!(result.unwrap().exit_code, 1);
        assert!(ui.has_output("ncdu cannot be installed"));
    }

    #[test]
    fn no_managers_is_fatal() {
        let (result, _) = check("ncdu", BTreeSet::new(), Privilege::Root);
        assert!(matches!(result, Err(ToolsenseError::NoPackageManagers)));
    }
}

//! Installation orchestration.
//!
//! An install attempt runs through fixed stages:
//!
//! 1. Preconditions: known tool, not already installed (unless forced), a
//!    present manager that packages it, and permission to run that manager
//! 2. Confirmation, supplied by the caller
//! 3. Optional backup of toolsense's state files
//! 4. The install command, bounded by a timeout
//! 5. A log record, then re-detection on success or rollback on failure
//!    (skipped when the tool was already on PATH before the attempt)

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::backup::snapshot_files;
use super::manager::{detect_present, PackageManager, Privilege};
use super::selector::Selection;
use super::{InstallLog, InstallOutcome, InstallationRecord};
use crate::cache::StatusKind;
use crate::detection::DetectionEngine;
use crate::error::{Result, ToolsenseError};
use crate::shell::{execute, parse_system_path, CommandOptions, CommandResult, Invocation};

/// Lines of command output kept in an `InstallFailed` error.
const FAILURE_TAIL_LINES: usize = 20;

/// Timeout for rollback commands.
const ROLLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Mockable dependencies for the orchestrator.
#[derive(Clone, Copy)]
pub struct InstallerContext<'a> {
    /// Run an invocation with a timeout.
    pub run: &'a dyn Fn(&Invocation, Duration) -> Result<CommandResult>,
    /// Package managers present on the host.
    pub present_managers: &'a dyn Fn() -> BTreeSet<PackageManager>,
    /// How system-level managers may be run.
    pub privilege: &'a dyn Fn() -> Privilege,
}

/// Build the default `InstallerContext` for production use.
pub fn default_context() -> InstallerContext<'static> {
    InstallerContext {
        run: &|invocation, timeout| execute(invocation, &CommandOptions::with_timeout(timeout)),
        present_managers: &|| detect_present(&parse_system_path()),
        privilege: &|| Privilege::detect(&parse_system_path()),
    }
}

/// Configuration for installs.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub forced_manager: Option<PackageManager>,
    pub preferred_managers: Vec<PackageManager>,
    pub timeout: Duration,
    /// When set, state files are copied here before each install.
    pub backup_dir: Option<PathBuf>,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            forced_manager: None,
            preferred_managers: vec![
                PackageManager::Apt,
                PackageManager::Snap,
                PackageManager::Brew,
                PackageManager::Cargo,
                PackageManager::Pipx,
                PackageManager::Flatpak,
            ],
            timeout: Duration::from_secs(300),
            backup_dir: None,
        }
    }
}

/// Per-call install flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallRequest {
    /// Reinstall even when already installed.
    pub force: bool,
    /// Do not require confirmation.
    pub skip_confirm: bool,
    /// The caller's confirmation answer; ignored with `skip_confirm`.
    pub confirmed: bool,
    /// Overrides the configured forced manager.
    pub manager: Option<PackageManager>,
}

impl InstallRequest {
    /// A request that needs no confirmation.
    pub fn unattended() -> Self {
        Self {
            skip_confirm: true,
            ..Default::default()
        }
    }
}

/// A validated install: every precondition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallPlan {
    pub tool: String,
    pub manager: PackageManager,
    pub package: String,
    /// The command to run, already escalated if needed.
    pub invocation: Invocation,
    /// Whether the command runs through sudo.
    pub escalated: bool,
}

/// Result of installing several tools.
#[derive(Debug, Default)]
pub struct BatchInstallReport {
    pub results: Vec<(String, Result<InstallationRecord>)>,
}

impl BatchInstallReport {
    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, r)| r.as_ref().is_ok_and(|rec| rec.is_success()))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }
}

/// Installs tools and keeps the cache and log in step.
pub struct Orchestrator<'a> {
    engine: &'a DetectionEngine,
    log: InstallLog,
    options: InstallOptions,
    ctx: InstallerContext<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        engine: &'a DetectionEngine,
        log: InstallLog,
        options: InstallOptions,
        ctx: InstallerContext<'a>,
    ) -> Self {
        Self {
            engine,
            log,
            options,
            ctx,
        }
    }

    pub fn log(&self) -> &InstallLog {
        &self.log
    }

    /// Check every precondition for installing `name`.
    ///
    /// The error names the first precondition that failed.
    pub fn can_install(&self, name: &str) -> Result<InstallPlan> {
        self.plan(name, false, None)
    }

    /// Build a plan, honoring `force` and a per-call manager override.
    pub fn plan(
        &self,
        name: &str,
        force: bool,
        manager: Option<PackageManager>,
    ) -> Result<InstallPlan> {
        let tool = self.engine.registry().require(name)?;

        if !force {
            let status = self.engine.status(name)?;
            if status.status == StatusKind::Installed {
                return Err(ToolsenseError::AlreadyInstalled {
                    tool: name.to_string(),
                });
            }
        }

        let present = (self.ctx.present_managers)();
        if present.is_empty() {
            return Err(ToolsenseError::NoPackageManagers);
        }

        let privilege = (self.ctx.privilege)();
        let selection = Selection {
            forced: manager.or(self.options.forced_manager),
            preferred: &self.options.preferred_managers,
            present: &present,
            privilege,
        };
        let manager = selection.select(tool)?;
        let package = tool
            .package_for(manager)
            .ok_or_else(|| ToolsenseError::NoSuitableManager {
                tool: name.to_string(),
                reason: format!("{} has no package mapping", manager),
            })?
            .to_string();

        let invocation = privilege
            .apply(manager.scope(), manager.install_invocation(&package))
            .ok_or_else(|| ToolsenseError::PermissionDenied {
                tool: name.to_string(),
                manager: manager.to_string(),
            })?;
        let escalated = invocation.program == "sudo";

        Ok(InstallPlan {
            tool: name.to_string(),
            manager,
            package,
            invocation,
            escalated,
        })
    }

    /// Install one tool.
    ///
    /// Returns a `success` record when the command succeeds (detection is
    /// re-run afterwards) or a `cancelled` record when confirmation was
    /// declined. Command failures and timeouts are logged as `failed`,
    /// rolled back, and returned as errors. Precondition failures write no
    /// record.
    pub fn install(&self, name: &str, request: InstallRequest) -> Result<InstallationRecord> {
        let plan = self.plan(name, request.force, request.manager)?;
        let was_present = self.engine.status(name)?.status.is_present();

        if !request.skip_confirm && !request.confirmed {
            let record = InstallationRecord::new(
                name,
                plan.manager,
                &plan.package,
                InstallOutcome::Cancelled,
                Duration::ZERO,
                "declined by user",
            );
            self.append(&record);
            tracing::info!("Install of '{}' cancelled", name);
            return Ok(record);
        }

        if let Some(dir) = &self.options.backup_dir {
            let mut files = vec![self.log.path().to_path_buf()];
            files.extend(self.engine.cache().path().map(|p| p.to_path_buf()));
            snapshot_files(dir, &files)?;
        }

        tracing::info!("Installing '{}' with {}: {}", name, plan.manager, plan.invocation);
        let start = Instant::now();
        let result = (self.ctx.run)(&plan.invocation, self.options.timeout);
        let elapsed = start.elapsed();

        let failure = match result {
            Ok(output) if output.success => None,
            Ok(output) if output.timed_out => Some((
                format!("timed out after {}s", self.options.timeout.as_secs()),
                ToolsenseError::InstallTimeout {
                    tool: name.to_string(),
                    seconds: self.options.timeout.as_secs(),
                },
            )),
            Ok(output) => Some((
                output.combined.clone(),
                ToolsenseError::InstallFailed {
                    tool: name.to_string(),
                    manager: plan.manager.to_string(),
                    output: tail(&output.combined, FAILURE_TAIL_LINES),
                },
            )),
            Err(e) => Some((
                e.to_string(),
                ToolsenseError::InstallFailed {
                    tool: name.to_string(),
                    manager: plan.manager.to_string(),
                    output: e.to_string(),
                },
            )),
        };

        if let Some((details, err)) = failure {
            let record = InstallationRecord::new(
                name,
                plan.manager,
                &plan.package,
                InstallOutcome::Failed,
                elapsed,
                details,
            );
            self.append(&record);
            if was_present {
                tracing::info!(
                    "Not rolling back '{}': a copy was installed before this attempt",
                    name
                );
            } else {
                self.rollback(&plan);
            }
            return Err(err);
        }

        let record = InstallationRecord::new(
            name,
            plan.manager,
            &plan.package,
            InstallOutcome::Success,
            elapsed,
            format!("installed via {}", plan.invocation),
        );
        self.append(&record);

        match self.engine.detect(name) {
            Ok(status) if status.status.is_present() => {
                tracing::info!("'{}' is now {}", name, status.status);
            }
            Ok(_) => tracing::warn!(
                "{} reported success but '{}' is still not on PATH",
                plan.manager,
                name
            ),
            Err(e) => tracing::warn!("Re-detection of '{}' failed: {}", name, e),
        }

        Ok(record)
    }

    /// Install several tools, isolating per-tool failures.
    ///
    /// Stops early only on an error that is fatal for the session.
    pub fn install_many(
        &self,
        names: &[String],
        request: InstallRequest,
    ) -> Result<BatchInstallReport> {
        let mut report = BatchInstallReport::default();
        for name in names {
            match self.install(name, request) {
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("{}", e);
                    report.results.push((name.clone(), Err(e)));
                }
                Ok(record) => report.results.push((name.clone(), Ok(record))),
            }
        }
        Ok(report)
    }

    /// Best-effort removal after a failed install. Errors are only logged.
    fn rollback(&self, plan: &InstallPlan) {
        let privilege = (self.ctx.privilege)();
        let Some(invocation) = privilege.apply(
            plan.manager.scope(),
            plan.manager.remove_invocation(&plan.package),
        ) else {
            return;
        };

        tracing::debug!("Rolling back '{}': {}", plan.tool, invocation);
        match (self.ctx.run)(&invocation, ROLLBACK_TIMEOUT) {
            Ok(result) if result.success => {
                tracing::info!("Rolled back partial install of '{}'", plan.tool)
            }
            Ok(result) => tracing::warn!(
                "Rollback of '{}' exited with {:?}",
                plan.tool,
                result.exit_code
            ),
            Err(e) => tracing::warn!("Rollback of '{}' failed: {}", plan.tool, e),
        }
    }

    fn append(&self, record: &InstallationRecord) {
        if let Err(e) = self.log.append(record) {
            tracing::warn!("Failed to write install log: {:#}", e);
        }
    }
}

fn tail(output: &str, lines: usize) -> String {
    let all: Vec<&str> = output.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

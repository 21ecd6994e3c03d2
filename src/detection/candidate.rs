//! Sources for the newest installable version of a tool.
//!
//! Used for the best-effort "outdated" check. Missing information is never
//! an error; it simply means the tool is not reported as outdated.

use std::time::Duration;

use crate::cache::InstallMethod;
use crate::install::PackageManager;
use crate::registry::ToolDescriptor;
use crate::shell::{execute, CommandOptions, Invocation};
use crate::version::Version;

/// Reports the version a package manager would install.
pub trait CandidateSource: Send + Sync {
    fn candidate_version(
        &self,
        tool: &ToolDescriptor,
        method: Option<InstallMethod>,
    ) -> Option<Version>;
}

/// Never reports a candidate; nothing is ever outdated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCandidates;

impl CandidateSource for NoCandidates {
    fn candidate_version(&self, _: &ToolDescriptor, _: Option<InstallMethod>) -> Option<Version> {
        None
    }
}

/// Reads candidates from the local apt cache (`apt-cache policy`).
///
/// Only consulted for tools installed through apt.
#[derive(Debug, Clone)]
pub struct AptCandidates {
    timeout: Duration,
}

impl AptCandidates {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CandidateSource for AptCandidates {
    fn candidate_version(
        &self,
        tool: &ToolDescriptor,
        method: Option<InstallMethod>,
    ) -> Option<Version> {
        if method != Some(InstallMethod::Apt) {
            return None;
        }
        let package = tool.package_for(PackageManager::Apt)?;
        let invocation = Invocation::new("apt-cache").args(["policy", package]);
        let result = execute(&invocation, &CommandOptions::with_timeout(self.timeout))
            .map_err(|e| tracing::debug!("apt-cache unavailable: {}", e))
            .ok()?;
        if !result.success {
            return None;
        }
        parse_apt_candidate(&result.stdout)
    }
}

/// Extract the `Candidate:` version from `apt-cache policy` output.
///
/// Debian epochs (`1:`) and revisions (`-1ubuntu2`) are ignored.
pub fn parse_apt_candidate(output: &str) -> Option<Version> {
    let line = output
        .lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix("Candidate:"))?
        .trim();
    if line == "(none)" {
        return None;
    }
    let without_epoch = line.split_once(':').map_or(line, |(_, rest)| rest);
    Version::extract(without_epoch)
}

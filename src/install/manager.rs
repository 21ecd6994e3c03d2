//! Package managers and their install/remove invocations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::shell::{is_elevated, resolve_executable, Invocation};

/// A package manager capable of installing tools.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    // System
    Apt,
    Snap,
    Flatpak,

    // User
    Brew,
    Cargo,
    Pipx,
}

/// Whether a manager writes system-wide or into the user's home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    System,
    User,
}

impl PackageManager {
    /// All managers, in fallback selection order.
    pub const ALL: [PackageManager; 6] = [
        PackageManager::Apt,
        PackageManager::Snap,
        PackageManager::Brew,
        PackageManager::Cargo,
        PackageManager::Pipx,
        PackageManager::Flatpak,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Snap => "snap",
            PackageManager::Flatpak => "flatpak",
            PackageManager::Brew => "brew",
            PackageManager::Cargo => "cargo",
            PackageManager::Pipx => "pipx",
        }
    }

    /// The executable used to drive this manager.
    pub fn executable(self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Snap => "snap",
            PackageManager::Flatpak => "flatpak",
            PackageManager::Brew => "brew",
            PackageManager::Cargo => "cargo",
            PackageManager::Pipx => "pipx",
        }
    }

    pub fn scope(self) -> Scope {
        match self {
            PackageManager::Apt | PackageManager::Snap | PackageManager::Flatpak => Scope::System,
            PackageManager::Brew | PackageManager::Cargo | PackageManager::Pipx => Scope::User,
        }
    }

    /// Invocation that installs `package`, without privilege escalation.
    pub fn install_invocation(self, package: &str) -> Invocation {
        let base = Invocation::new(self.executable());
        match self {
            PackageManager::Apt => base
                .args(["install", "-y", "--no-install-recommends", package])
                .env("DEBIAN_FRONTEND", "noninteractive"),
            PackageManager::Snap => base.args(["install", package]),
            PackageManager::Flatpak => {
                base.args(["install", "-y", "--noninteractive", "flathub", package])
            }
            PackageManager::Brew => base
                .args(["install", package])
                .env("HOMEBREW_NO_AUTO_UPDATE", "1"),
            PackageManager::Cargo => base.args(["install", "--locked", package]),
            PackageManager::Pipx => base.args(["install", package]),
        }
    }

    /// Invocation that removes `package`, used for rollback.
    pub fn remove_invocation(self, package: &str) -> Invocation {
        let base = Invocation::new(self.executable());
        match self {
            PackageManager::Apt => base
                .args(["remove", "-y", package])
                .env("DEBIAN_FRONTEND", "noninteractive"),
            PackageManager::Snap => base.args(["remove", package]),
            PackageManager::Flatpak => base.args(["uninstall", "-y", "--noninteractive", package]),
            PackageManager::Brew => base.args(["uninstall", package]),
            PackageManager::Cargo => base.args(["uninstall", package]),
            PackageManager::Pipx => base.args(["uninstall", package]),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let name = match lowered.as_str() {
            "apt-get" => "apt",
            "homebrew" | "linuxbrew" => "brew",
            other => other,
        };
        PackageManager::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| format!("unknown package manager '{}'", s))
    }
}

/// Detect which package managers are present on the given PATH.
pub fn detect_present(path_entries: &[PathBuf]) -> BTreeSet<PackageManager> {
    PackageManager::ALL
        .into_iter()
        .filter(|m| resolve_executable(m.executable(), path_entries).is_some())
        .collect()
}

/// How the current process can run system-level managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Running as root; no escalation needed.
    Root,
    /// `sudo` is available; system-level commands run via `sudo -n`.
    Sudo,
    /// No way to escalate.
    Unprivileged,
}

impl Privilege {
    /// Probe the host.
    pub fn detect(path_entries: &[PathBuf]) -> Self {
        if is_elevated() {
            Privilege::Root
        } else if resolve_executable("sudo", path_entries).is_some() {
            Privilege::Sudo
        } else {
            Privilege::Unprivileged
        }
    }

    /// Whether a manager of `scope` may run under this privilege.
    pub fn permits(self, scope: Scope) -> bool {
        scope == Scope::User || self != Privilege::Unprivileged
    }

    /// Apply escalation to an invocation for a manager of `scope`.
    ///
    /// Returns `None` when the scope needs privileges that are unavailable.
    /// `sudo -n` never prompts; callers must refresh credentials beforehand.
    pub fn apply(self, scope: Scope, invocation: Invocation) -> Option<Invocation> {
        match (scope, self) {
            (Scope::User, _) | (Scope::System, Privilege::Root) => Some(invocation),
            (Scope::System, Privilege::Sudo) => Some(with_sudo(invocation)),
            (Scope::System, Privilege::Unprivileged) => None,
        }
    }
}

/// `sudo` drops the caller's environment, so variables are passed as
/// `VAR=value` arguments, which sudo applies to the command.
fn with_sudo(invocation: Invocation) -> Invocation {
    let mut args: Vec<String> = vec!["-n".to_string()];
    args.extend(
        invocation
            .env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value)),
    );
    args.push(invocation.program);
    args.extend(invocation.args);
    Invocation {
        program: "sudo".to_string(),
        args,
        env: Default::default(),
    }
}

//! Per-tool status records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::install::PackageManager;
use crate::version::Version;

/// Detection outcome for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    NotInstalled,
    Installed,
    Outdated,
    Incompatible,
}

impl StatusKind {
    /// Whether the tool counts as usable for degradation and capability checks.
    ///
    /// An outdated tool still works; an incompatible one does not.
    pub fn counts_as_installed(self) -> bool {
        matches!(self, StatusKind::Installed | StatusKind::Outdated)
    }

    /// Whether an executable was found at all.
    pub fn is_present(self) -> bool {
        self != StatusKind::NotInstalled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::NotInstalled => "not_installed",
            StatusKind::Installed => "installed",
            StatusKind::Outdated => "outdated",
            StatusKind::Incompatible => "incompatible",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an installed tool got onto the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    Apt,
    Snap,
    Flatpak,
    Brew,
    Cargo,
    Pipx,
    Manual,
}

impl InstallMethod {
    /// Guess the install method from where the executable lives.
    pub fn infer_from_path(path: &Path) -> Self {
        let text = path.to_string_lossy();
        if text.starts_with("/snap/") || text.contains("/snap/bin/") {
            InstallMethod::Snap
        } else if text.contains("flatpak") {
            InstallMethod::Flatpak
        } else if text.contains("linuxbrew") || text.contains("homebrew") {
            InstallMethod::Brew
        } else if text.contains("/.cargo/bin/") {
            InstallMethod::Cargo
        } else if text.contains("/.local/pipx/") || text.contains("/.local/bin/") {
            InstallMethod::Pipx
        } else if ["/usr/bin/", "/bin/", "/usr/sbin/", "/sbin/"]
            .iter()
            .any(|prefix| text.starts_with(prefix))
        {
            InstallMethod::Apt
        } else {
            InstallMethod::Manual
        }
    }

    /// The package manager behind this method, if any.
    pub fn manager(self) -> Option<PackageManager> {
        match self {
            InstallMethod::Apt => Some(PackageManager::Apt),
            InstallMethod::Snap => Some(PackageManager::Snap),
            InstallMethod::Flatpak => Some(PackageManager::Flatpak),
            InstallMethod::Brew => Some(PackageManager::Brew),
            InstallMethod::Cargo => Some(PackageManager::Cargo),
            InstallMethod::Pipx => Some(PackageManager::Pipx),
            InstallMethod::Manual => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self.manager() {
            Some(manager) => manager.as_str(),
            None => "manual",
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PackageManager> for InstallMethod {
    fn from(manager: PackageManager) -> Self {
        match manager {
            PackageManager::Apt => InstallMethod::Apt,
            PackageManager::Snap => InstallMethod::Snap,
            PackageManager::Flatpak => InstallMethod::Flatpak,
            PackageManager::Brew => InstallMethod::Brew,
            PackageManager::Cargo => InstallMethod::Cargo,
            PackageManager::Pipx => InstallMethod::Pipx,
        }
    }
}

/// Last-known state of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Tool identity name.
    pub tool: String,

    pub status: StatusKind,

    /// Detected version, when one could be parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    /// Resolved executable path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<InstallMethod>,

    /// When this status was determined.
    pub checked_at: DateTime<Utc>,
}

impl ToolStatus {
    /// A status for a tool whose executables were not found.
    pub fn not_installed(tool: impl Into<String>, checked_at: DateTime<Utc>) -> Self {
        Self {
            tool: tool.into(),
            status: StatusKind::NotInstalled,
            version: None,
            path: None,
            method: None,
            checked_at,
        }
    }

    /// A status for a tool found at `path`.
    pub fn found(
        tool: impl Into<String>,
        status: StatusKind,
        version: Option<Version>,
        path: PathBuf,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let method = InstallMethod::infer_from_path(&path);
        Self {
            tool: tool.into(),
            status,
            version,
            path: Some(path),
            method: Some(method),
            checked_at,
        }
    }

    /// Age of this record relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.checked_at)
    }

    /// Whether the record is still within `ttl` at `now`.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn installed_and_outdated_count_as_installed() {
        assert!(StatusKind::Installed.counts_as_installed());
        assert!(StatusKind::Outdated.counts_as_installed());
        assert!(!StatusKind::Incompatible.counts_as_installed());
        assert!(!StatusKind::NotInstalled.counts_as_installed());
        assert!(StatusKind::Incompatible.is_present());
    }

    #[test]
    fn infer_method_from_common_paths() {
        let cases = [
            ("/usr/bin/fdfind", InstallMethod::Apt),
            ("/snap/bin/btop", InstallMethod::Snap),
            ("/home/linuxbrew/.linuxbrew/bin/gum", InstallMethod::Brew),
            ("/home/u/.cargo/bin/dust", InstallMethod::Cargo),
            ("/home/u/.local/bin/tldr", InstallMethod::Pipx),
            ("/var/lib/flatpak/exports/bin/x", InstallMethod::Flatpak),
            ("/opt/custom/bin/tool", InstallMethod::Manual),
        ];
        for (path, expected) in cases {
            assert_eq!(InstallMethod::infer_from_path(Path::new(path)), expected, "{path}");
        }
    }

    #[test]
    fn ttl_boundary_is_stale() {
        let checked = at("2026-01-01T00:00:00Z");
        let status = ToolStatus::not_installed("fd", checked);
        let ttl = Duration::seconds(86_400);

        assert!(status.is_fresh(ttl, checked + Duration::seconds(86_399)));
        assert!(!status.is_fresh(ttl, checked + Duration::seconds(86_400)));
        assert!(!status.is_fresh(ttl, checked + Duration::days(3)));
    }

    #[test]
    fn json_shape() {
        let status = ToolStatus::found(
            "fd",
            StatusKind::Installed,
            Some(Version::new(8, 7, 0)),
            PathBuf::from("/usr/bin/fdfind"),
            at("2026-01-01T00:00:00Z"),
        );
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"tool":"fd","status":"installed","version":"8.7.0","path":"/usr/bin/fdfind","method":"apt","checked_at":"2026-01-01T00:00:00Z"}"#
        );
        let back: ToolStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }

    #[test]
    fn not_installed_omits_optional_fields() {
        let status = ToolStatus::not_installed("gum", at("2026-01-01T00:00:00Z"));
        let json = serde_json::to_string(&status).unwrap();
        assert!(!json.contains("version"));
        assert!(!json.contains("path"));
        assert!(json.contains(r#""status":"not_installed""#));
    }
}

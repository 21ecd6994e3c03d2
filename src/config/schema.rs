//! Settings schema for `config.yml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::default_cache_path;
use crate::detection::BatchMode;
use crate::install::backup::default_backup_dir;
use crate::install::{default_log_path, InstallOptions, PackageManager};

/// User settings. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Probe tools on a worker pool instead of one at a time.
    pub parallel_detection: bool,

    /// Worker pool size. Values below 1 are treated as 1.
    pub max_workers: usize,

    /// Managers tried, in order, before the built-in fallback order.
    pub preferred_managers: Vec<PackageManager>,

    /// Manager to use whenever it is present and packages the tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_manager: Option<PackageManager>,

    pub install_timeout_secs: u64,

    pub version_probe_timeout_secs: u64,

    /// Snapshot the cache and install log before each install.
    pub backup_before_install: bool,

    /// Ask the package manager for a newer candidate version during detection.
    pub check_outdated: bool,

    pub cache_ttl_secs: u64,

    pub verbose: bool,

    pub quiet: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Extra tool descriptors layered over the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_overlay: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parallel_detection: true,
            max_workers: 4,
            preferred_managers: PackageManager::ALL.to_vec(),
            forced_manager: None,
            install_timeout_secs: 300,
            version_probe_timeout_secs: 5,
            backup_before_install: false,
            check_outdated: false,
            cache_ttl_secs: crate::cache::DEFAULT_TTL_SECS,
            verbose: false,
            quiet: false,
            cache_path: None,
            log_path: None,
            backup_dir: None,
            registry_overlay: None,
        }
    }
}

impl Settings {
    pub fn workers(&self) -> usize {
        self.max_workers.max(1)
    }

    pub fn batch_mode(&self) -> BatchMode {
        BatchMode::from_settings(self.parallel_detection, self.workers())
    }

    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs)
    }

    pub fn version_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.version_probe_timeout_secs)
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        let secs = i64::try_from(self.cache_ttl_secs).unwrap_or(i64::MAX);
        chrono::Duration::seconds(secs.min(i64::MAX / 1000))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_path.clone().unwrap_or_else(default_cache_path)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path.clone().unwrap_or_else(default_log_path)
    }

    /// Backup directory, or `None` when backups are off.
    pub fn backup_dir(&self) -> Option<PathBuf> {
        if !self.backup_before_install {
            return None;
        }
        Some(self.backup_dir.clone().unwrap_or_else(default_backup_dir))
    }

    pub fn install_options(&self) -> InstallOptions {
        InstallOptions {
            forced_manager: self.forced_manager,
            preferred_managers: self.preferred_managers.clone(),
            timeout: self.install_timeout(),
            backup_dir: self.backup_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.parallel_detection);
        assert_eq!(settings.max_workers, 4);
        assert_eq!(settings.install_timeout(), Duration::from_secs(300));
        assert_eq!(settings.cache_ttl(), chrono::Duration::hours(24));
        assert_eq!(settings.preferred_managers.first(), Some(&PackageManager::Apt));
        assert!(settings.backup_dir().is_none());
    }

    #[test]
    fn workers_clamped_to_one() {
        let settings = Settings {
            max_workers: 0,
            ..Default::default()
        };
        assert_eq!(settings.workers(), 1);
        assert_eq!(settings.batch_mode(), BatchMode::Sequential);
        assert_eq!(Settings::default().batch_mode(), BatchMode::Pool(4));
    }

    #[test]
    fn sequential_when_parallel_disabled() {
        let settings = Settings {
            parallel_detection: false,
            ..Default::default()
        };
        assert_eq!(settings.batch_mode(), BatchMode::Sequential);
    }

    #[test]
    fn backup_dir_follows_toggle() {
        let settings = Settings {
            backup_before_install: true,
            backup_dir: Some(PathBuf::from("/tmp/snapshots")),
            ..Default::default()
        };
        assert_eq!(settings.backup_dir(), Some(PathBuf::from("/tmp/snapshots")));
        assert_eq!(
            settings.install_options().backup_dir,
            Some(PathBuf::from("/tmp/snapshots"))
        );
    }
}

//! Error types for toolsense operations.
//!
//! This module defines [`ToolsenseError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-tool failures (a missing manager, a failed install) are isolated:
//!   batch operations record them and keep going
//! - Only [`ToolsenseError::is_fatal`] errors abort a whole session
//! - Use `anyhow::Error` (via `ToolsenseError::Other`) for unexpected I/O
//!   context inside file-backed stores

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for toolsense operations.
#[derive(Debug, Error)]
pub enum ToolsenseError {
    /// The tool name is not part of the loaded registry.
    #[error("Unknown tool '{tool}': not in the tool registry. Run 'toolsense status' to list known tools.")]
    ToolNotInRegistry { tool: String },

    /// No present package manager declares a package for the tool.
    #[error("No suitable package manager for '{tool}': {reason}")]
    NoSuitableManager { tool: String, reason: String },

    /// Installing via a system-level manager needs root or sudo.
    #[error("Permission denied installing '{tool}' with {manager}: run as root or make sudo available")]
    PermissionDenied { tool: String, manager: String },

    /// No semantic version could be extracted.
    #[error("Could not parse a version from '{input}'")]
    VersionUnparseable { input: String },

    /// A detected version falls outside the registry bounds.
    #[error("'{tool}' version {version} does not satisfy {constraint}")]
    VersionIncompatible {
        tool: String,
        version: String,
        constraint: String,
    },

    /// The install command did not finish in time.
    #[error("Installing '{tool}' timed out after {seconds}s")]
    InstallTimeout { tool: String, seconds: u64 },

    /// The install command exited unsuccessfully.
    #[error("Installing '{tool}' with {manager} failed:\n{output}")]
    InstallFailed {
        tool: String,
        manager: String,
        output: String,
    },

    /// A comparison operator or bound could not be understood.
    #[error("Invalid version operator or bound: '{input}' (expected one of =, !=, >, >=, <, <=, ~, ^ followed by a version)")]
    InvalidOperator { input: String },

    /// A status cache entry could not be read.
    #[error("Corrupt status cache entry at line {line}: {message}")]
    CacheCorrupt { line: usize, message: String },

    /// Tool is already installed and `--force` was not given.
    #[error("'{tool}' is already installed (use --force to reinstall)")]
    AlreadyInstalled { tool: String },

    /// Not a single supported package manager exists on this host.
    #[error("No supported package manager found on this system (looked for apt-get, snap, flatpak, brew, cargo, pipx)")]
    NoPackageManagers,

    /// The tool catalog could not be loaded.
    #[error("Failed to load tool registry from {source_name}: {message}")]
    RegistryLoad {
        source_name: String,
        message: String,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolsenseError {
    /// Whether this error ends the whole session rather than a single tool.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ToolsenseError::RegistryLoad { .. } | ToolsenseError::NoPackageManagers
        )
    }
}

/// Result type alias for toolsense operations.
pub type Result<T> = std::result::Result<T, ToolsenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_in_registry_displays_tool() {
        let err = ToolsenseError::ToolNotInRegistry {
            tool: "nonexistent".into(),
        };
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn no_suitable_manager_displays_reason() {
        let err = ToolsenseError::NoSuitableManager {
            tool: "fd".into(),
            reason: "no package mapping".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fd"));
        assert!(msg.contains("no package mapping"));
    }

    #[test]
    fn permission_denied_mentions_sudo() {
        let err = ToolsenseError::PermissionDenied {
            tool: "btop".into(),
            manager: "apt".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("btop"));
        assert!(msg.contains("sudo"));
    }

    #[test]
    fn install_failed_surfaces_output() {
        let err = ToolsenseError::InstallFailed {
            tool: "bat".into(),
            manager: "apt".into(),
            output: "E: Unable to locate package bat".into(),
        };
        assert!(err.to_string().contains("Unable to locate package"));
    }

    #[test]
    fn install_timeout_displays_seconds() {
        let err = ToolsenseError::InstallTimeout {
            tool: "gum".into(),
            seconds: 30,
        };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn only_registry_and_manager_absence_are_fatal() {
        assert!(ToolsenseError::NoPackageManagers.is_fatal());
        assert!(ToolsenseError::RegistryLoad {
            source_name: "catalog/core.yml".into(),
            message: "bad yaml".into(),
        }
        .is_fatal());
        assert!(!ToolsenseError::InvalidOperator { input: "=>".into() }.is_fatal());
        assert!(!ToolsenseError::CacheCorrupt {
            line: 3,
            message: "eof".into()
        }
        .is_fatal());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ToolsenseError = io_err.into();
        assert!(matches!(err, ToolsenseError::Io(_)));
    }
}

//! Host platform probes: privilege, terminals, PATH.

use std::path::{Path, PathBuf};

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Whether stdin and stdout are both attached to a terminal.
pub fn is_interactive_terminal() -> bool {
    use std::io::IsTerminal;
    console::user_attended() && std::io::stdin().is_terminal()
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve an executable name by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Absolute or
/// relative paths containing a separator are checked directly.
pub fn resolve_executable(name: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    if name.contains(std::path::MAIN_SEPARATOR) {
        let candidate = PathBuf::from(name);
        return (candidate.is_file() && is_executable(&candidate)).then_some(candidate);
    }

    path_entries
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

//! Live host state consulted by capability predicates.

use std::collections::BTreeMap;
use std::path::Path;

use crate::shell::is_interactive_terminal;

/// Host state that can change between calls and is never cached.
pub trait LiveEnvironment: Send + Sync {
    /// Whether the process is attached to an interactive terminal.
    fn is_interactive_terminal(&self) -> bool;

    /// Whether `/proc` exists and can be read.
    fn proc_readable(&self) -> bool;

    /// Value of an environment variable, if set and non-empty.
    fn env_var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl LiveEnvironment for SystemEnvironment {
    fn is_interactive_terminal(&self) -> bool {
        is_interactive_terminal()
    }

    fn proc_readable(&self) -> bool {
        let proc = Path::new("/proc");
        proc.is_dir() && std::fs::read_dir(proc).is_ok()
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// A fixed environment, for tests and non-interactive embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    pub interactive: bool,
    pub proc_readable: bool,
    pub vars: BTreeMap<String, String>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_proc(mut self, readable: bool) -> Self {
        self.proc_readable = readable;
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl LiveEnvironment for StaticEnvironment {
    fn is_interactive_terminal(&self) -> bool {
        self.interactive
    }

    fn proc_readable(&self) -> bool {
        self.proc_readable
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_environment_ignores_empty_vars() {
        let env = StaticEnvironment::new()
            .with_var("DISPLAY", "")
            .with_var("WAYLAND_DISPLAY", "wayland-0");
        assert_eq!(env.env_var("DISPLAY"), None);
        assert_eq!(env.env_var("WAYLAND_DISPLAY").as_deref(), Some("wayland-0"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn system_proc_is_readable_on_linux() {
        assert!(SystemEnvironment.proc_readable());
    }
}

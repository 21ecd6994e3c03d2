//! Capability resolution.
//!
//! A capability is a named functional need ("advanced-search") that one or
//! more registry tools can satisfy. Whether a tool actually satisfies it right
//! now depends on its cached status and on live host state, which is
//! re-evaluated on every call.

pub mod environment;

pub use environment::{LiveEnvironment, StaticEnvironment, SystemEnvironment};

use chrono::Utc;
use std::fmt;

use crate::cache::{StatusCache, ToolStatus};
use crate::registry::{ToolDescriptor, ToolRegistry};

/// Well-known capability names.
pub mod names {
    pub const INTERACTIVE_UI: &str = "interactive-ui";
    pub const ADVANCED_MONITORING: &str = "advanced-monitoring";
    pub const ADVANCED_SEARCH: &str = "advanced-search";
    pub const STORAGE_ANALYSIS: &str = "storage-analysis";
    pub const ENHANCED_VIEWING: &str = "enhanced-viewing";
    pub const ADVANCED_GIT_UI: &str = "advanced-git-ui";
    pub const CLIPBOARD: &str = "clipboard";
}

/// Extra host condition a capability needs beyond its tool being installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Only the installed check applies.
    Installed,
    /// Needs an interactive terminal.
    InteractiveTerminal,
    /// Needs a readable `/proc`.
    ReadableProc,
    /// Needs at least one of these variables set.
    AnyEnvVar(&'static [&'static str]),
}

impl Requirement {
    /// The requirement attached to a capability name.
    pub fn for_capability(capability: &str) -> Self {
        match capability {
            names::INTERACTIVE_UI => Requirement::InteractiveTerminal,
            names::ADVANCED_MONITORING => Requirement::ReadableProc,
            names::CLIPBOARD => Requirement::AnyEnvVar(&["DISPLAY", "WAYLAND_DISPLAY"]),
            _ => Requirement::Installed,
        }
    }

    /// Evaluate only the host condition.
    pub fn holds(self, env: &dyn LiveEnvironment) -> bool {
        match self {
            Requirement::Installed => true,
            Requirement::InteractiveTerminal => env.is_interactive_terminal(),
            Requirement::ReadableProc => env.proc_readable(),
            Requirement::AnyEnvVar(keys) => keys.iter().any(|k| env.env_var(k).is_some()),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Installed => f.write_str("tool installed"),
            Requirement::InteractiveTerminal => f.write_str("interactive terminal"),
            Requirement::ReadableProc => f.write_str("readable /proc"),
            Requirement::AnyEnvVar(keys) => write!(f, "one of {} set", keys.join(", ")),
        }
    }
}

/// A (tool, capability) pair and the predicate deciding its availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityBinding {
    pub tool: String,
    pub capability: String,
    pub requirement: Requirement,
}

impl CapabilityBinding {
    pub fn new(tool: impl Into<String>, capability: impl Into<String>) -> Self {
        let capability = capability.into();
        Self {
            tool: tool.into(),
            requirement: Requirement::for_capability(&capability),
            capability,
        }
    }

    /// Whether the binding holds given the tool's status and the live host.
    ///
    /// Staleness is not checked here; pass `None` for a stale record.
    pub fn is_satisfied(&self, status: Option<&ToolStatus>, env: &dyn LiveEnvironment) -> bool {
        let installed = status.is_some_and(|s| s.status.counts_as_installed());
        installed && self.requirement.holds(env)
    }
}

/// Resolves capabilities to the tools that can currently provide them.
pub struct CapabilityResolver<'a> {
    registry: &'a ToolRegistry,
    cache: &'a StatusCache,
    env: &'a dyn LiveEnvironment,
}

impl<'a> CapabilityResolver<'a> {
    pub fn new(
        registry: &'a ToolRegistry,
        cache: &'a StatusCache,
        env: &'a dyn LiveEnvironment,
    ) -> Self {
        Self {
            registry,
            cache,
            env,
        }
    }

    /// Bindings for every tool advertising `capability`, highest priority first.
    pub fn bindings(&self, capability: &str) -> Vec<CapabilityBinding> {
        self.registry
            .with_capability(capability)
            .into_iter()
            .map(|t| CapabilityBinding::new(&t.name, capability))
            .collect()
    }

    /// Tools that can provide `capability` right now, highest priority first.
    pub fn resolve(&self, capability: &str) -> Vec<&'a ToolDescriptor> {
        self.registry
            .with_capability(capability)
            .into_iter()
            .filter(|t| self.binding_holds(&t.name, capability))
            .collect()
    }

    /// The highest-priority tool providing `capability` right now.
    pub fn best(&self, capability: &str) -> Option<&'a ToolDescriptor> {
        self.resolve(capability).into_iter().next()
    }

    /// Whether `tool` currently provides `capability`.
    ///
    /// False when the tool is unknown or does not advertise the capability.
    pub fn is_available(&self, tool: &str, capability: &str) -> bool {
        self.registry
            .get(tool)
            .is_some_and(|t| t.provides(capability) && self.binding_holds(tool, capability))
    }

    /// Whether any tool provides `capability` right now.
    pub fn is_capability_available(&self, capability: &str) -> bool {
        !self.resolve(capability).is_empty()
    }

    /// Records past the cache TTL count as unknown, so the tool is not
    /// available until it is re-detected.
    fn binding_holds(&self, tool: &str, capability: &str) -> bool {
        let status = self.cache.get_fresh(tool, Utc::now());
        CapabilityBinding::new(tool, capability).is_satisfied(status.as_ref(), self.env)
    }
}

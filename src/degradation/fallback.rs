//! Primary and fallback implementations of watched capabilities.
//!
//! Callers describe what they want as a [`Request`]; a [`CapabilityBackend`]
//! turns it into a [`Plan`]. The backend is picked at the call site: the
//! highest-priority available tool when there is one, otherwise a fallback
//! built from baseline OS utilities.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::capability::names;
use crate::shell::Invocation;

/// Capabilities whose absence activates a fallback.
pub const WATCH_LIST: [&str; 6] = [
    names::INTERACTIVE_UI,
    names::ADVANCED_MONITORING,
    names::ADVANCED_SEARCH,
    names::STORAGE_ANALYSIS,
    names::ENHANCED_VIEWING,
    names::ADVANCED_GIT_UI,
];

/// Something a caller wants done through a watched capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<'a> {
    /// Ask a yes/no question.
    Confirm { prompt: &'a str },
    /// Show a snapshot of running processes.
    Monitor,
    /// Find files under `root` whose name contains `pattern`.
    Search { root: &'a Path, pattern: &'a str },
    /// Summarize disk usage of `path`.
    DiskUsage { path: &'a Path },
    /// Display a file.
    View { path: &'a Path },
    /// Summarize a git repository.
    GitOverview { repo: &'a Path },
}

impl Request<'_> {
    /// The capability that serves this request.
    pub fn capability(&self) -> &'static str {
        match self {
            Request::Confirm { .. } => names::INTERACTIVE_UI,
            Request::Monitor => names::ADVANCED_MONITORING,
            Request::Search { .. } => names::ADVANCED_SEARCH,
            Request::DiskUsage { .. } => names::STORAGE_ANALYSIS,
            Request::View { .. } => names::ENHANCED_VIEWING,
            Request::GitOverview { .. } => names::ADVANCED_GIT_UI,
        }
    }
}

/// How to carry out a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Run this command.
    Exec(Invocation),
    /// Ask this question with a plain line-based prompt.
    PlainPrompt(String),
}

/// One implementation of a capability.
pub trait CapabilityBackend {
    /// Identifier shown to users, e.g. `fd` or `fallback:find-search`.
    fn id(&self) -> String;

    /// Whether this is a baseline fallback.
    fn is_fallback(&self) -> bool;

    /// Plan the request, or `None` if this backend cannot serve it.
    fn plan(&self, request: &Request<'_>) -> Option<Plan>;
}

/// Backend driven by an installed registry tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBackend {
    pub tool: String,
    /// Resolved executable.
    pub program: PathBuf,
}

impl ToolBackend {
    pub fn new(tool: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            program: program.into(),
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(self.program.to_string_lossy())
    }
}

impl CapabilityBackend for ToolBackend {
    fn id(&self) -> String {
        self.tool.clone()
    }

    fn is_fallback(&self) -> bool {
        false
    }

    fn plan(&self, request: &Request<'_>) -> Option<Plan> {
        let inv = self.invocation();
        let planned = match (self.tool.as_str(), request) {
            ("gum", Request::Confirm { prompt }) => inv.arg("confirm").arg(*prompt),
            ("btop" | "htop", Request::Monitor) => inv,
            ("fd", Request::Search { root, pattern }) => inv
                .args(["--ignore-case", "--fixed-strings", *pattern])
                .arg(root.to_string_lossy()),
            ("ripgrep", Request::Search { root, pattern }) => inv
                .args(["--files", "--iglob"])
                .arg(format!("*{}*", pattern))
                .arg(root.to_string_lossy()),
            ("ncdu" | "dust", Request::DiskUsage { path }) => inv.arg(path.to_string_lossy()),
            ("bat", Request::View { path }) => {
                inv.arg("--paging=never").arg(path.to_string_lossy())
            }
            ("lazygit", Request::GitOverview { repo }) => {
                inv.arg("--path").arg(repo.to_string_lossy())
            }
            _ => return None,
        };
        Some(Plan::Exec(planned))
    }
}

/// Baseline implementations used when a watched capability is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fallback {
    PlainPrompt,
    TopSnapshot,
    FindSearch,
    DuSummary,
    CatViewer,
    GitStatus,
}

impl Fallback {
    /// The fallback for a watched capability.
    pub fn for_capability(capability: &str) -> Option<Self> {
        match capability {
            names::INTERACTIVE_UI => Some(Fallback::PlainPrompt),
            names::ADVANCED_MONITORING => Some(Fallback::TopSnapshot),
            names::ADVANCED_SEARCH => Some(Fallback::FindSearch),
            names::STORAGE_ANALYSIS => Some(Fallback::DuSummary),
            names::ENHANCED_VIEWING => Some(Fallback::CatViewer),
            names::ADVANCED_GIT_UI => Some(Fallback::GitStatus),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Fallback::PlainPrompt => "plain-prompt",
            Fallback::TopSnapshot => "top-snapshot",
            Fallback::FindSearch => "find-search",
            Fallback::DuSummary => "du-summary",
            Fallback::CatViewer => "cat-viewer",
            Fallback::GitStatus => "git-status",
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CapabilityBackend for Fallback {
    fn id(&self) -> String {
        format!("fallback:{}", self.as_str())
    }

    fn is_fallback(&self) -> bool {
        true
    }

    fn plan(&self, request: &Request<'_>) -> Option<Plan> {
        let plan = match (self, request) {
            (Fallback::PlainPrompt, Request::Confirm { prompt }) => {
                Plan::PlainPrompt(prompt.to_string())
            }
            (Fallback::TopSnapshot, Request::Monitor) => {
                Plan::Exec(Invocation::new("top").args(["-b", "-n", "1"]))
            }
            (Fallback::FindSearch, Request::Search { root, pattern }) => Plan::Exec(
                Invocation::new("find")
                    .arg(root.to_string_lossy())
                    .arg("-iname")
                    .arg(format!("*{}*", pattern)),
            ),
            (Fallback::DuSummary, Request::DiskUsage { path }) => Plan::Exec(
                Invocation::new("du")
                    .arg("-sh")
                    .arg(path.to_string_lossy()),
            ),
            (Fallback::CatViewer, Request::View { path }) => {
                Plan::Exec(Invocation::new("cat").arg(path.to_string_lossy()))
            }
            (Fallback::GitStatus, Request::GitOverview { repo }) => Plan::Exec(
                Invocation::new("git")
                    .arg("-C")
                    .arg(repo.to_string_lossy())
                    .arg("status"),
            ),
            _ => return None,
        };
        Some(plan)
    }
}

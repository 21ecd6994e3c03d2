//! Per-tool detection state machine.
//!
//! ```text
//! unknown -> probing -> not_installed
//!                    -> installed -> compatible | incompatible | outdated
//! ```

use std::fmt;

use crate::cache::StatusKind;

/// Where detection of one tool currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    Unknown,
    Probing,
    NotInstalled,
    Installed,
    Compatible,
    Incompatible,
    Outdated,
}

impl DetectionPhase {
    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(self, next: DetectionPhase) -> bool {
        use DetectionPhase::*;
        matches!(
            (self, next),
            (Unknown, Probing)
                | (Probing, NotInstalled)
                | (Probing, Installed)
                | (Installed, Compatible)
                | (Installed, Incompatible)
                | (Installed, Outdated)
        )
    }

    /// Move to `next`, or stay put (and log) on an illegal transition.
    pub fn advance(self, tool: &str, next: DetectionPhase) -> DetectionPhase {
        if self.can_advance_to(next) {
            tracing::trace!("{}: {} -> {}", tool, self, next);
            next
        } else {
            tracing::warn!("{}: ignoring illegal transition {} -> {}", tool, self, next);
            self
        }
    }

    /// Whether detection has finished.
    ///
    /// `Installed` is terminal only when no version could be read.
    pub fn is_settled(self) -> bool {
        !matches!(self, DetectionPhase::Unknown | DetectionPhase::Probing)
    }

    /// The cached status for a settled phase.
    pub fn status_kind(self) -> Option<StatusKind> {
        match self {
            DetectionPhase::Unknown | DetectionPhase::Probing => None,
            DetectionPhase::NotInstalled => Some(StatusKind::NotInstalled),
            DetectionPhase::Installed | DetectionPhase::Compatible => Some(StatusKind::Installed),
            DetectionPhase::Incompatible => Some(StatusKind::Incompatible),
            DetectionPhase::Outdated => Some(StatusKind::Outdated),
        }
    }
}

impl fmt::Display for DetectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectionPhase::Unknown => "unknown",
            DetectionPhase::Probing => "probing",
            DetectionPhase::NotInstalled => "not_installed",
            DetectionPhase::Installed => "installed",
            DetectionPhase::Compatible => "compatible",
            DetectionPhase::Incompatible => "incompatible",
            DetectionPhase::Outdated => "outdated",
        };
        f.write_str(name)
    }
}

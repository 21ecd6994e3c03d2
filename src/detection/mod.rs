//! Tool detection.
//!
//! - [`phase`] - The per-tool detection state machine
//! - [`candidate`] - Best-effort sources for newer installable versions
//! - [`engine`] - Single and batch detection, sequential or pooled

pub mod candidate;
pub mod engine;
pub mod phase;

pub use candidate::{parse_apt_candidate, AptCandidates, CandidateSource, NoCandidates};
pub use engine::{BatchMode, DetectionEngine, DetectionReport};
pub use phase::DetectionPhase;

//! Graceful degradation.
//!
//! - [`mode`] - Degradation modes and the category thresholds behind them
//! - [`fallback`] - Primary and fallback backends for watched capabilities
//! - [`manager`] - Derives the current [`DegradationState`] from the cache

pub mod fallback;
pub mod manager;
pub mod mode;

pub use fallback::{CapabilityBackend, Fallback, Plan, Request, ToolBackend, WATCH_LIST};
pub use manager::{DegradationManager, DegradationState};
pub use mode::{CategoryCounts, DegradationMode};

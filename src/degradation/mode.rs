//! System-wide degradation modes.

use serde::Serialize;
use std::fmt;

/// Core tools below this share of installed put the system in core-only mode.
pub const CORE_THRESHOLD_PERCENT: usize = 80;
/// Enhanced share needed for full mode.
pub const FULL_THRESHOLD_PERCENT: usize = 60;
/// Enhanced share needed for reduced mode.
pub const REDUCED_THRESHOLD_PERCENT: usize = 30;

/// How much optional functionality is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegradationMode {
    Full,
    Reduced,
    Minimal,
    CoreOnly,
}

impl DegradationMode {
    /// Pick the mode from installed/total counts.
    ///
    /// Core coverage is checked first; enhanced coverage only matters once
    /// core tools are in place.
    pub fn from_counts(core: CategoryCounts, enhanced: CategoryCounts) -> Self {
        if !core.at_least_percent(CORE_THRESHOLD_PERCENT) {
            DegradationMode::CoreOnly
        } else if enhanced.at_least_percent(FULL_THRESHOLD_PERCENT) {
            DegradationMode::Full
        } else if enhanced.at_least_percent(REDUCED_THRESHOLD_PERCENT) {
            DegradationMode::Reduced
        } else {
            DegradationMode::Minimal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DegradationMode::Full => "full",
            DegradationMode::Reduced => "reduced",
            DegradationMode::Minimal => "minimal",
            DegradationMode::CoreOnly => "core-only",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DegradationMode::Full => "All enhanced features available",
            DegradationMode::Reduced => "Some enhanced features use simpler fallbacks",
            DegradationMode::Minimal => "Most enhanced features use fallbacks",
            DegradationMode::CoreOnly => "Core tools are missing; only baseline behavior is available",
        }
    }
}

impl fmt::Display for DegradationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installed and total tool counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CategoryCounts {
    pub installed: usize,
    pub total: usize,
}

impl CategoryCounts {
    pub fn new(installed: usize, total: usize) -> Self {
        Self { installed, total }
    }

    /// `installed / total >= percent / 100`, exactly, without floats.
    ///
    /// An empty category is treated as fully covered.
    pub fn at_least_percent(self, percent: usize) -> bool {
        self.total == 0 || self.installed * 100 >= self.total * percent
    }

    /// Coverage as a fraction in `[0, 1]`.
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.installed as f64 / self.total as f64
        }
    }
}

impl fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.0}%)",
            self.installed,
            self.total,
            self.ratio() * 100.0
        )
    }
}

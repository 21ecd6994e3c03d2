//! Batch detection progress.

use indicatif::{ProgressBar, ProgressStyle};

use crate::cache::ToolStatus;

/// Progress bar advanced once per detected tool.
pub struct DetectionProgress {
    bar: ProgressBar,
}

impl DetectionProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("{spinner:.magenta} [{bar:24}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);
        Self { bar }
    }

    /// A bar that draws nothing, for quiet or JSON output.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn record(&self, status: &ToolStatus) {
        self.bar.set_message(status.tool.clone());
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

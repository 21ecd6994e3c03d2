//! Visual theme and styling.

use console::Style;

use crate::cache::StatusKind;
use crate::degradation::DegradationMode;

/// Styles used for terminal output.
#[derive(Debug, Clone)]
pub struct ToolsenseTheme {
    /// Success messages and installed tools (green).
    pub success: Style,
    /// Warnings, outdated tools, reduced modes (orange).
    pub warning: Style,
    /// Errors and incompatible tools (red bold).
    pub error: Style,
    /// Secondary text.
    pub dim: Style,
    /// Tool names and other highlighted values (bold).
    pub highlight: Style,
    /// Section headers (magenta bold).
    pub header: Style,
}

impl Default for ToolsenseTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolsenseTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().magenta(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }

    /// Icon and label for a tool status.
    pub fn format_status(&self, kind: StatusKind) -> String {
        let (style, icon) = match kind {
            StatusKind::Installed => (&self.success, "✓"),
            StatusKind::Outdated => (&self.warning, "↑"),
            StatusKind::Incompatible => (&self.error, "✗"),
            StatusKind::NotInstalled => (&self.dim, "○"),
        };
        format!("{}", style.apply_to(format!("{} {}", icon, kind)))
    }

    pub fn format_mode(&self, mode: DegradationMode) -> String {
        let style = match mode {
            DegradationMode::Full => &self.success,
            DegradationMode::Reduced | DegradationMode::Minimal => &self.warning,
            DegradationMode::CoreOnly => &self.error,
        };
        format!("{}", style.apply_to(mode))
    }
}

/// Whether to emit colors: off under `NO_COLOR` or when stdout is not a TTY.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stdout().is_term()
}

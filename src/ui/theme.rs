//! Visual theme and styling.

use console::Style;

/// Terminal styles for resolve reports and command output.
#[derive(Debug, Clone)]
pub struct SdkgateTheme {
    /// Enabled capabilities, success messages (green).
    pub success: Style,
    /// Warnings and missing optional artifacts (orange).
    pub warning: Style,
    /// Disabled capabilities, errors (red bold).
    pub error: Style,
    /// Dim/secondary text such as paths.
    pub dim: Style,
    /// Definition names and other highlighted text (bold).
    pub highlight: Style,
    /// Headers (magenta bold).
    pub header: Style,
    /// Key labels in key-value displays (bold).
    pub key: Style,
}

impl Default for SdkgateTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SdkgateTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().magenta(),
            key: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            key: Style::new(),
        }
    }

    /// Pick the colored or plain theme.
    pub fn for_color(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
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

    /// Format a skipped item (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

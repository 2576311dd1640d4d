//! Visual theme and styling.

use console::Style;

/// Tally's visual theme.
#[derive(Debug, Clone)]
pub struct TallyTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational/running elements (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for step titles (bold).
    pub step_title: Style,
    /// Style for step numbers and counters (dim).
    pub step_number: Style,
    /// Style for durations and timestamps (dim).
    pub duration: Style,
    /// Style for box-drawing borders (dim).
    pub border: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
    /// Style for values in key-value displays (normal).
    pub value: Style,
    /// Style for amounts and balances (green bold).
    pub amount: Style,
}

impl Default for TallyTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl TallyTheme {
    /// Create the default Tally theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            step_title: Style::new().bold(),
            step_number: Style::new().dim(),
            duration: Style::new().dim(),
            border: Style::new().dim(),
            key: Style::new().bold(),
            value: Style::new(),
            amount: Style::new().green().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            step_title: Style::new(),
            step_number: Style::new(),
            duration: Style::new(),
            border: Style::new(),
            key: Style::new(),
            value: Style::new(),
            amount: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a skipped message (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format a step title line.
    pub fn format_step(&self, name: &str, description: &str) -> String {
        format!(
            "{} {}",
            self.step_title.apply_to(format!("◆ {}", name)),
            self.dim.apply_to(description)
        )
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("⚖"),
            self.highlight.apply_to(title)
        )
    }
}

/// Classification of a finished step or flow, for icons and styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Failed,
    Skipped,
    Cancelled,
}

impl StatusKind {
    pub fn icon(&self) -> &'static str {
        match self {
            StatusKind::Success => "✓",
            StatusKind::Failed => "✗",
            StatusKind::Skipped => "○",
            StatusKind::Cancelled => "⚠",
        }
    }

    /// Icon alone in the matching theme style, for table cells.
    pub fn styled_icon(&self, theme: &TallyTheme) -> String {
        format!("{}", self.style(theme).apply_to(self.icon()))
    }

    /// Icon plus message in the matching theme style.
    pub fn format(&self, theme: &TallyTheme, msg: &str) -> String {
        format!(
            "{}",
            self.style(theme).apply_to(format!("{} {}", self.icon(), msg))
        )
    }

    fn style<'a>(&self, theme: &'a TallyTheme) -> &'a Style {
        match self {
            StatusKind::Success => &theme.success,
            StatusKind::Failed => &theme.error,
            StatusKind::Skipped => &theme.dim,
            StatusKind::Cancelled => &theme.warning,
        }
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // NO_COLOR convention (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

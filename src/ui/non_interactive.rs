//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, TallyError};

use super::progress::format_duration;
use super::theme::TallyTheme;
use super::{
    FlowSummary, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "y" | "1")
}

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `TALLY_PROMPT_*` environment variables or the
/// prompt's default; anything left unanswered is an error rather than a hang.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        // Collect TALLY_PROMPT_* env vars
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("TALLY_PROMPT_"))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        if self.mode.shows_errors() {
            eprintln!("✗ {}", msg);
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("TALLY_PROMPT_{}", prompt.key.to_uppercase());
        let answer = self
            .env_overrides
            .get(&env_key)
            .cloned()
            .or_else(|| prompt.default.clone());

        match answer {
            Some(value) => match prompt.prompt_type {
                PromptType::Confirm => Ok(PromptResult::Bool(parse_bool(&value))),
                PromptType::Input => Ok(PromptResult::String(value)),
            },
            None => Err(TallyError::PromptUnavailable {
                key: prompt.key.clone(),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let enabled = self.mode.shows_spinners();
        if enabled {
            println!("  {}", message);
        }
        Box::new(NoopSpinner { enabled })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_flow_header(&mut self, flow: &str, step_count: usize) {
        if self.mode.shows_status() {
            let step_label = if step_count == 1 { "step" } else { "steps" };
            println!("\n⚖ tally {} · {} {}\n", flow, step_count, step_label);
        }
    }

    fn show_summary(&mut self, summary: &FlowSummary) {
        if !self.mode.shows_status() {
            return;
        }

        let name_width = summary
            .lines
            .iter()
            .map(|l| l.name.len())
            .max()
            .unwrap_or(8);

        println!();
        println!("  ┌─ Summary ──────────────────────────");

        for line in &summary.lines {
            let icon = line.status.icon();
            let duration_str = line.duration.map(format_duration).unwrap_or_default();
            let detail_str = line.detail.as_deref().unwrap_or("");

            let right_side = if !duration_str.is_empty() {
                duration_str
            } else {
                detail_str.to_string()
            };

            println!("  │ {} {:<name_width$} {}", icon, line.name, right_side);
        }

        println!("  ├────────────────────────────────────");
        println!(
            "  │ Total: {} · {} completed · {} skipped",
            format_duration(summary.total_duration),
            summary.completed_count(),
            summary.skipped_count(),
        );
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }

    fn set_output_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
    }
}

/// Spinner that prints plain finish lines (no animation).
struct NoopSpinner {
    enabled: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.enabled {
            println!("{}", TallyTheme::new().format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.enabled {
            println!("{}", TallyTheme::new().format_error(msg));
        }
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.enabled {
            println!("{}", TallyTheme::new().format_skipped(msg));
        }
    }
}

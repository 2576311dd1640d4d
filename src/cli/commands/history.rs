//! History command implementation.
//!
//! `tally history` shows recent flow runs from the history file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::args::HistoryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::state::{FlowRecord, FlowRunStatus, HistoryStore};
use crate::ui::{format_duration, format_relative_time, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The history command implementation.
pub struct HistoryCommand {
    config: Config,
    home: PathBuf,
    args: HistoryArgs,
}

impl HistoryCommand {
    /// Create a new history command.
    pub fn new(config: &Config, home: &Path, args: HistoryArgs) -> Self {
        Self {
            config: config.clone(),
            home: home.to_path_buf(),
            args,
        }
    }

    /// Format a single run entry line.
    fn format_run_line(record: &FlowRecord) -> String {
        let tag = match record.status {
            FlowRunStatus::Completed => "[ok]",
            FlowRunStatus::Failed => "[FAIL]",
            FlowRunStatus::Cancelled => "[cancelled]",
        };

        let step_count = record.completed_steps.len();
        let step_label = if step_count == 1 { "step" } else { "steps" };
        format!(
            "{} {} ({}) - {} ({} {}, {})",
            tag,
            format_relative_time(record.timestamp),
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.flow,
            step_count,
            step_label,
            format_duration(Duration::from_millis(record.duration_ms))
        )
    }
}

impl Command for HistoryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let store = HistoryStore::new(&self.home, self.config.history_limit);
        let limit = self.args.limit.unwrap_or(10);
        let records = store.recent(limit)?;

        if self.args.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(CommandResult::success());
        }

        if records.is_empty() {
            ui.message("No flow runs recorded yet.");
            return Ok(CommandResult::success());
        }

        ui.show_header("Flow History");
        for record in &records {
            ui.message(&Self::format_run_line(record));
            if let Some(failed_step) = &record.failed_step {
                ui.message(&format!("    Failed at: {}", failed_step));
            }
            if let Some(error) = &record.error {
                ui.error(&format!("    Error: {}", error));
            }
        }

        Ok(CommandResult::success())
    }
}

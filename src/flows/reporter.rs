//! Renders flow engine events on a [`UserInterface`].

use std::cell::RefCell;
use std::time::{Duration, Instant};

use crate::flow::{FlowResult, FlowStatus, Reporter, Step};
use crate::ui::{
    format_duration, FlowSummary, SpinnerHandle, StatusKind, SummaryLine, UserInterface,
};

/// Reporter that turns engine events into headers, spinners, and a final
/// summary box.
///
/// Holds the interface behind a `RefCell` because the input collector needs
/// the same terminal during the run; the engine only ever calls one of them
/// at a time, so the borrows never overlap.
pub struct UiReporter<'a, 'b> {
    ui: &'a RefCell<&'b mut dyn UserInterface>,
    spinner: Option<Box<dyn SpinnerHandle>>,
    lines: Vec<SummaryLine>,
    current_step: Option<(String, Instant)>,
    step_index: usize,
    step_count: usize,
}

impl<'a, 'b> UiReporter<'a, 'b> {
    pub fn new(ui: &'a RefCell<&'b mut dyn UserInterface>) -> Self {
        Self {
            ui,
            spinner: None,
            lines: Vec::new(),
            current_step: None,
            step_index: 0,
            step_count: 0,
        }
    }

    fn elapsed(&self) -> Option<Duration> {
        self.current_step.as_ref().map(|(_, start)| start.elapsed())
    }
}

impl Reporter for UiReporter<'_, '_> {
    fn flow_started(&mut self, flow: &str, steps: &[Step]) {
        self.step_count = steps.len();
        let mut ui = self.ui.borrow_mut();
        ui.show_flow_header(flow, steps.len());
        for (i, step) in steps.iter().enumerate() {
            let marker = if step.required() { "" } else { " (optional)" };
            ui.message(&format!(
                "  {}. {}{}",
                i + 1,
                step.description(),
                marker
            ));
        }
    }

    fn step_started(&mut self, step: &Step) {
        self.step_index += 1;
        self.current_step = Some((step.name().to_string(), Instant::now()));
        let label = format!(
            "[{}/{}] {} — {}",
            self.step_index,
            self.step_count,
            step.name(),
            step.description()
        );
        self.spinner = Some(self.ui.borrow_mut().start_spinner(&label));
    }

    fn step_completed(&mut self, step: &Step) {
        let elapsed = self.elapsed().unwrap_or_default();
        if let Some(mut spinner) = self.spinner.take() {
            spinner.finish_success(&format!(
                "{} ({})",
                step.name(),
                format_duration(elapsed)
            ));
        }
        self.lines.push(SummaryLine {
            name: step.name().to_string(),
            status: StatusKind::Success,
            duration: Some(elapsed),
            detail: None,
        });
        self.current_step = None;
    }

    fn step_skipped(&mut self, step: &Step, reason: &str) {
        if let Some(mut spinner) = self.spinner.take() {
            spinner.finish_skipped(&format!("{} skipped: {}", step.name(), reason));
        }
        self.lines.push(SummaryLine {
            name: step.name().to_string(),
            status: StatusKind::Skipped,
            duration: self.elapsed(),
            detail: Some(reason.to_string()),
        });
        self.current_step = None;
    }

    fn step_retrying(&mut self, step: &Step, attempt: u32, max_retries: u32, delay: Duration) {
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.set_message(&format!(
                "{} — retrying ({}/{}) in {}",
                step.name(),
                attempt,
                max_retries,
                format_duration(delay)
            ));
        }
    }

    fn flow_finished(&mut self, result: &FlowResult) {
        // A step still in flight here means the run failed or was
        // interrupted mid-attempt; close its spinner and record the line.
        if let Some((name, start)) = self.current_step.take() {
            let (status, detail) = match result.status {
                FlowStatus::Cancelled => (StatusKind::Cancelled, Some("interrupted".to_string())),
                _ => (StatusKind::Failed, result.error.clone()),
            };
            if let Some(mut spinner) = self.spinner.take() {
                match status {
                    StatusKind::Cancelled => spinner.finish_error(&format!("{} interrupted", name)),
                    _ => spinner.finish_error(&format!(
                        "{} failed: {}",
                        name,
                        result.error.as_deref().unwrap_or("unknown error")
                    )),
                }
            }
            self.lines.push(SummaryLine {
                name,
                status,
                duration: Some(start.elapsed()),
                detail,
            });
        }

        let outcome = match result.status {
            FlowStatus::Completed => StatusKind::Success,
            FlowStatus::Cancelled => StatusKind::Cancelled,
            _ => StatusKind::Failed,
        };
        let summary = FlowSummary {
            flow: result.flow.clone(),
            lines: std::mem::take(&mut self.lines),
            total_duration: result.duration,
            outcome,
            failure: result.error.clone(),
        };

        let mut ui = self.ui.borrow_mut();
        ui.show_summary(&summary);
        match result.status {
            FlowStatus::Completed => {
                ui.success(&format!(
                    "{} finished in {}",
                    result.flow,
                    format_duration(result.duration)
                ));
            }
            FlowStatus::Cancelled => {
                ui.warning(&format!("{} cancelled", result.flow));
            }
            _ => {
                let at = result
                    .failed_step
                    .as_deref()
                    .map(|s| format!(" at '{}'", s))
                    .unwrap_or_default();
                ui.error(&format!(
                    "{} failed{}: {}",
                    result.flow,
                    at,
                    result.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }
    }
}

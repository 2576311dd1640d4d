//! Test doubles for flow execution.
//!
//! Mirrors the spirit of [`crate::ui::MockUI`]: scriptable collaborators
//! that record everything the engine does, so tests assert on behavior
//! without terminals, clocks, or sleeps.

use std::time::Duration;

use anyhow::anyhow;
use serde_json::Value;

use crate::error::Result;

use super::context::ExecutionContext;
use super::engine::InputCollector;
use super::report::Reporter;
use super::result::{FlowResult, FlowStatus};
use super::retry::{BackoffTimer, WaitOutcome};
use super::step::Step;

/// Timer that records requested delays instead of serving them.
#[derive(Debug, Default)]
pub struct MockTimer {
    /// Every delay the retry policy asked for, in order.
    pub waits: Vec<Duration>,
    interrupt_after: Option<usize>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `elapsed_waits` waits normally, then report an interrupt on the
    /// next one. `interrupting_after(0)` interrupts the very first wait.
    pub fn interrupting_after(elapsed_waits: usize) -> Self {
        Self {
            waits: Vec::new(),
            interrupt_after: Some(elapsed_waits),
        }
    }

    /// Sum of all recorded delays.
    pub fn total_wait(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl BackoffTimer for MockTimer {
    fn wait(&mut self, delay: Duration, _cancel: &super::cancel::CancelToken) -> WaitOutcome {
        self.waits.push(delay);
        match self.interrupt_after {
            Some(allowed) if self.waits.len() > allowed => WaitOutcome::Interrupted,
            _ => WaitOutcome::Elapsed,
        }
    }
}

/// Input collector with scripted answers.
#[derive(Debug, Default)]
pub struct MockCollector {
    inputs: Vec<(String, Value)>,
    confirm: bool,
    error: Option<String>,
    /// Times `collect` was invoked.
    pub collect_calls: u32,
    /// Times `confirm` was invoked.
    pub confirm_calls: u32,
}

impl MockCollector {
    /// Collector that answers the confirmation with yes.
    pub fn confirming() -> Self {
        Self {
            confirm: true,
            ..Self::default()
        }
    }

    /// Collector that declines the confirmation.
    pub fn declining() -> Self {
        Self::default()
    }

    /// Collector whose `collect` fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Script a value to be written into the context.
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.push((key.into(), value.into()));
        self
    }
}

impl InputCollector for MockCollector {
    fn collect(&mut self, ctx: &mut ExecutionContext) -> Result<()> {
        self.collect_calls += 1;
        if let Some(message) = &self.error {
            return Err(anyhow!("{message}").into());
        }
        for (key, value) in &self.inputs {
            ctx.set(key.clone(), value.clone());
        }
        Ok(())
    }

    fn confirm(&mut self) -> Result<bool> {
        self.confirm_calls += 1;
        Ok(self.confirm)
    }
}

/// Reporter that records every event it receives.
#[derive(Debug, Default)]
pub struct MockReporter {
    /// Flow names passed to `flow_started`.
    pub started_flows: Vec<String>,
    /// Step names of the declared plan, as seen by `flow_started`.
    pub planned_steps: Vec<String>,
    /// Steps whose operations were started.
    pub started_steps: Vec<String>,
    /// Steps reported completed.
    pub completed_steps: Vec<String>,
    /// Skipped steps with the reason given.
    pub skipped_steps: Vec<(String, String)>,
    /// Retry notices: (step, upcoming attempt, delay).
    pub retries: Vec<(String, u32, Duration)>,
    /// Terminal statuses from `flow_finished`.
    pub finished: Vec<FlowStatus>,
    /// Flattened event log, for ordering assertions.
    pub events: Vec<String>,
}

impl MockReporter {
    pub fn has_completed(&self, step: &str) -> bool {
        self.completed_steps.iter().any(|name| name == step)
    }

    pub fn has_skipped(&self, step: &str) -> bool {
        self.skipped_steps.iter().any(|(name, _)| name == step)
    }
}

impl Reporter for MockReporter {
    fn flow_started(&mut self, flow: &str, steps: &[Step]) {
        self.started_flows.push(flow.to_string());
        self.planned_steps
            .extend(steps.iter().map(|step| step.name().to_string()));
        self.events.push(format!("flow_started:{flow}"));
    }

    fn step_started(&mut self, step: &Step) {
        self.started_steps.push(step.name().to_string());
        self.events.push(format!("step_started:{}", step.name()));
    }

    fn step_completed(&mut self, step: &Step) {
        self.completed_steps.push(step.name().to_string());
        self.events.push(format!("step_completed:{}", step.name()));
    }

    fn step_skipped(&mut self, step: &Step, reason: &str) {
        self.skipped_steps
            .push((step.name().to_string(), reason.to_string()));
        self.events.push(format!("step_skipped:{}", step.name()));
    }

    fn step_retrying(&mut self, step: &Step, attempt: u32, _max_retries: u32, delay: Duration) {
        self.retries
            .push((step.name().to_string(), attempt, delay));
        self.events.push(format!("step_retrying:{}", step.name()));
    }

    fn flow_finished(&mut self, result: &FlowResult) {
        self.finished.push(result.status);
        self.events.push(format!("flow_finished:{}", result.status));
    }
}

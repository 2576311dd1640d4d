//! Flow orchestration: the state machine that drives steps.
//!
//! A [`FlowEngine`] is built `Pending`, runs `Running` for the duration of
//! one [`FlowEngine::execute`] call, and ends in exactly one of the terminal
//! states carried by [`FlowResult`]: `Completed`, `Failed`, or `Cancelled`.
//! `execute` consumes the engine, so a flow cannot be run twice and a result
//! is constructed exactly once.

use std::time::Instant;

use tracing::debug;

use crate::error::Result;

use super::cancel::CancelToken;
use super::context::ExecutionContext;
use super::report::Reporter;
use super::result::FlowResult;
use super::retry::{AttemptOutcome, BackoffTimer, RetryPolicy, SystemTimer};
use super::step::Step;

/// Collects flow inputs from the outside world (terminal prompts, CLI
/// flags, environment). Invoked exactly once per flow, before any step.
pub trait InputCollector {
    /// Populate the context with collected inputs.
    fn collect(&mut self, ctx: &mut ExecutionContext) -> Result<()>;

    /// Explicit go/no-go from the user. Returning `false` ends the flow as
    /// `Cancelled` with nothing attempted — a controlled abort, not an error.
    fn confirm(&mut self) -> Result<bool>;
}

/// True iff every declared dependency of `step` appears in `completed`,
/// the names of steps that have already finished successfully. Positions in
/// the declared order play no part: a dependency that was declared earlier
/// but skipped does not satisfy this check.
pub fn dependencies_met(step: &Step, completed: &[String]) -> bool {
    step.dependencies()
        .iter()
        .all(|dep| completed.iter().any(|done| done == dep))
}

/// Executes one declared sequence of steps to a terminal [`FlowResult`].
pub struct FlowEngine {
    name: String,
    steps: Vec<Step>,
    retry: RetryPolicy,
    cancel: CancelToken,
    timer: Box<dyn BackoffTimer>,
}

impl FlowEngine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            retry: RetryPolicy::default(),
            cancel: CancelToken::new(),
            timer: Box::new(SystemTimer),
        }
    }

    /// Append a step; steps run in the order they were added.
    pub fn add_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use a shared token so callers (e.g. a SIGINT handler) can cancel the
    /// run. The engine only ever observes this explicit token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replace the backoff timer. Tests use this to record delays instead
    /// of serving them.
    pub fn with_timer(mut self, timer: impl BackoffTimer + 'static) -> Self {
        self.timer = Box::new(timer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the flow to a terminal state.
    ///
    /// Blocks until done. Always returns exactly one result; operation
    /// failures, unmet dependencies, collector errors, and cancellation are
    /// all converted here and never escape as `Err` or panics.
    pub fn execute(
        self,
        inputs: &mut dyn InputCollector,
        reporter: &mut dyn Reporter,
    ) -> FlowResult {
        let FlowEngine {
            name,
            steps,
            retry,
            cancel,
            mut timer,
        } = self;

        let start = Instant::now();
        debug!("flow '{}' starting with {} step(s)", name, steps.len());
        reporter.flow_started(&name, &steps);

        let mut ctx = ExecutionContext::new();

        if let Err(error) = inputs.collect(&mut ctx) {
            let result = FlowResult::failed(
                name,
                Vec::new(),
                None,
                error.to_string(),
                ctx,
                start.elapsed(),
            );
            return seal(reporter, result);
        }

        match inputs.confirm() {
            Ok(true) => {}
            Ok(false) => {
                let result =
                    FlowResult::cancelled(name, Vec::new(), None, ctx, start.elapsed());
                return seal(reporter, result);
            }
            Err(error) => {
                let result = FlowResult::failed(
                    name,
                    Vec::new(),
                    None,
                    error.to_string(),
                    ctx,
                    start.elapsed(),
                );
                return seal(reporter, result);
            }
        }

        let mut completed: Vec<String> = Vec::new();

        for step in &steps {
            // Per-step boundary: an interrupt lands on the step in flight.
            if cancel.is_cancelled() {
                let result = FlowResult::cancelled(
                    name.clone(),
                    completed,
                    Some(step.name().to_string()),
                    ctx,
                    start.elapsed(),
                );
                return seal(reporter, result);
            }

            if !dependencies_met(step, &completed) {
                let message = format!("dependencies not met for step: {}", step.name());
                let result = FlowResult::failed(
                    name.clone(),
                    completed,
                    Some(step.name().to_string()),
                    message,
                    ctx,
                    start.elapsed(),
                );
                return seal(reporter, result);
            }

            reporter.step_started(step);

            match retry.run(step, &mut ctx, &cancel, timer.as_mut(), reporter) {
                AttemptOutcome::Completed { attempts } => {
                    debug!(
                        "step '{}' completed after {} attempt(s)",
                        step.name(),
                        attempts
                    );
                    completed.push(step.name().to_string());
                    reporter.step_completed(step);
                }
                AttemptOutcome::Exhausted {
                    attempts,
                    last_error,
                } => {
                    if step.required() {
                        let result = FlowResult::failed(
                            name.clone(),
                            completed,
                            Some(step.name().to_string()),
                            last_error,
                            ctx,
                            start.elapsed(),
                        );
                        return seal(reporter, result);
                    }
                    debug!(
                        "optional step '{}' skipped after {} attempt(s): {}",
                        step.name(),
                        attempts,
                        last_error
                    );
                    reporter.step_skipped(step, &last_error);
                }
                AttemptOutcome::Cancelled => {
                    let result = FlowResult::cancelled(
                        name.clone(),
                        completed,
                        Some(step.name().to_string()),
                        ctx,
                        start.elapsed(),
                    );
                    return seal(reporter, result);
                }
            }
        }

        let result = FlowResult::completed(name, completed, ctx, start.elapsed());
        seal(reporter, result)
    }
}

/// Every exit path funnels through here so the final event always fires.
fn seal(reporter: &mut dyn Reporter, result: FlowResult) -> FlowResult {
    debug!("flow '{}' finished: {}", result.flow, result.status);
    reporter.flow_finished(&result);
    result
}

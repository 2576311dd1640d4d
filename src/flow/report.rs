//! Observability interface for flow execution.

use std::time::Duration;

use super::result::FlowResult;
use super::step::Step;

/// Sink for flow execution events.
///
/// The engine reports what happened and consumes no return values; how
/// events are rendered (terminal, logs, nothing) is the sink's business.
pub trait Reporter {
    /// The flow is about to run: name plus the declared step list, in order.
    fn flow_started(&mut self, flow: &str, steps: &[Step]);

    /// A step's operation is about to be attempted.
    fn step_started(&mut self, step: &Step);

    /// A step finished successfully.
    fn step_completed(&mut self, step: &Step);

    /// An optional step exhausted its attempts and was skipped.
    fn step_skipped(&mut self, step: &Step, reason: &str);

    /// A failed attempt will be retried: the upcoming attempt number, the
    /// attempt bound, and the backoff delay about to be served. Default
    /// no-op so sinks may ignore retry chatter.
    fn step_retrying(&mut self, _step: &Step, _attempt: u32, _max_retries: u32, _delay: Duration) {}

    /// The flow reached a terminal state.
    fn flow_finished(&mut self, result: &FlowResult);
}

/// Reporter that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn flow_started(&mut self, _flow: &str, _steps: &[Step]) {}

    fn step_started(&mut self, _step: &Step) {}

    fn step_completed(&mut self, _step: &Step) {}

    fn step_skipped(&mut self, _step: &Step, _reason: &str) {}

    fn flow_finished(&mut self, _result: &FlowResult) {}
}

//! Step declarations: the unit of work a flow executes.

use std::fmt;

use super::context::ExecutionContext;

/// Default attempt bound for a step.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Outcome of a single attempt of a step's operation.
///
/// Operations report failure through this tag rather than by panicking or
/// returning error types; the retry loop and the engine branch on the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The attempt succeeded.
    Success,
    /// The attempt failed in a way that may succeed if retried.
    Transient(String),
    /// The operation observed a cancellation signal mid-attempt.
    Cancelled,
}

impl StepOutcome {
    /// Build a transient failure from any displayable reason.
    pub fn transient(reason: impl Into<String>) -> Self {
        StepOutcome::Transient(reason.into())
    }

    /// True for [`StepOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success)
    }
}

/// A unit of work invoked with the flow's [`ExecutionContext`].
///
/// Implementations must be safe to invoke up to `max_retries` times
/// (at-least-once semantics). The engine does not catch unwinds; a panic in
/// an operation is a bug, not a failure mode.
pub trait StepOperation {
    fn execute(&self, ctx: &mut ExecutionContext) -> StepOutcome;
}

/// Plain closures work as operations.
impl<F> StepOperation for F
where
    F: Fn(&mut ExecutionContext) -> StepOutcome,
{
    fn execute(&self, ctx: &mut ExecutionContext) -> StepOutcome {
        self(ctx)
    }
}

/// A declarative step in a flow: name, operation, retry bound, and the
/// names of steps that must have completed before it may run.
pub struct Step {
    name: String,
    description: String,
    operation: Box<dyn StepOperation>,
    required: bool,
    max_retries: u32,
    timeout_seconds: Option<u64>,
    dependencies: Vec<String>,
}

impl Step {
    /// Create a required step with the default attempt bound and no
    /// dependencies.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        operation: impl StepOperation + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            operation: Box::new(operation),
            required: true,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_seconds: None,
            dependencies: Vec::new(),
        }
    }

    /// Mark the step optional: exhausting its attempts skips it instead of
    /// failing the flow.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the total attempt bound. Clamped to at least one attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Advisory per-attempt deadline, surfaced to operations and reporting.
    /// Enforcement belongs to the operation (remote calls carry it as their
    /// request timeout); the engine itself never interrupts an attempt.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Declare the steps that must already be completed before this one runs.
    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Invoke the operation once against the context.
    pub fn attempt(&self, ctx: &mut ExecutionContext) -> StepOutcome {
        self.operation.execute(ctx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("max_retries", &self.max_retries)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

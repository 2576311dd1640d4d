//! Terminal outcome of one flow run.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::context::ExecutionContext;

/// Lifecycle state of a flow.
///
/// `Pending` (built, not yet executed) and `Running` are transient; only the
/// three terminal states ever appear in a [`FlowResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl FlowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlowStatus::Completed | FlowStatus::Failed | FlowStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowStatus::Pending => "pending",
            FlowStatus::Running => "running",
            FlowStatus::Completed => "completed",
            FlowStatus::Failed => "failed",
            FlowStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome record produced by one [`crate::flow::FlowEngine::execute`] call.
///
/// Constructed exactly once, at the end of the run; immutable thereafter.
/// The caller derives all user-visible behavior (messages, exit code) from
/// this record — the engine itself never prints or exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowResult {
    /// Terminal state; never `Pending` or `Running`.
    pub status: FlowStatus,
    /// Name of the flow that ran.
    pub flow: String,
    /// Steps that finished successfully, in execution order.
    pub completed_steps: Vec<String>,
    /// The step in flight when the flow failed or was cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,
    /// Failure reason; set only for `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Final snapshot of the execution context.
    pub data: ExecutionContext,
    /// Elapsed wall-clock time of the run, confirmation wait included.
    #[serde(rename = "duration_ms", with = "duration_ms")]
    pub duration: Duration,
}

impl FlowResult {
    pub fn completed(
        flow: impl Into<String>,
        completed_steps: Vec<String>,
        data: ExecutionContext,
        duration: Duration,
    ) -> Self {
        Self {
            status: FlowStatus::Completed,
            flow: flow.into(),
            completed_steps,
            failed_step: None,
            error: None,
            data,
            duration,
        }
    }

    pub fn failed(
        flow: impl Into<String>,
        completed_steps: Vec<String>,
        failed_step: Option<String>,
        error: impl Into<String>,
        data: ExecutionContext,
        duration: Duration,
    ) -> Self {
        Self {
            status: FlowStatus::Failed,
            flow: flow.into(),
            completed_steps,
            failed_step,
            error: Some(error.into()),
            data,
            duration,
        }
    }

    /// Cancellation is a controlled abort, not an error: no message is
    /// attached, and `failed_step` is set only when a step was in flight.
    pub fn cancelled(
        flow: impl Into<String>,
        completed_steps: Vec<String>,
        failed_step: Option<String>,
        data: ExecutionContext,
        duration: Duration,
    ) -> Self {
        Self {
            status: FlowStatus::Cancelled,
            flow: flow.into(),
            completed_steps,
            failed_step,
            error: None,
            data,
            duration,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == FlowStatus::Completed
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

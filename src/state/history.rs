//! Flow run records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flow::{FlowResult, FlowStatus};

/// Terminal status of a recorded run. Mirrors the terminal half of
/// [`FlowStatus`]; the transient states never reach the history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowRunStatus {
    Completed,
    Failed,
    Cancelled,
}

impl FlowRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowRunStatus::Completed => "completed",
            FlowRunStatus::Failed => "failed",
            FlowRunStatus::Cancelled => "cancelled",
        }
    }
}

/// A record of one flow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRecord {
    /// When the record was written (end of the run).
    pub timestamp: DateTime<Utc>,

    /// Flow name (e.g. "onboarding").
    pub flow: String,

    /// Run identifier seeded into the execution context.
    pub flow_id: Option<String>,

    /// How the run ended.
    pub status: FlowRunStatus,

    /// Steps that finished successfully, in execution order.
    pub completed_steps: Vec<String>,

    /// The step in flight when the run failed or was cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<String>,

    /// Failure reason, for failed runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

impl FlowRecord {
    /// Build a record from a terminal flow result.
    pub fn from_result(result: &FlowResult) -> Self {
        let status = match result.status {
            FlowStatus::Failed => FlowRunStatus::Failed,
            FlowStatus::Cancelled => FlowRunStatus::Cancelled,
            // Pending/Running never appear in a FlowResult.
            _ => FlowRunStatus::Completed,
        };

        Self {
            timestamp: Utc::now(),
            flow: result.flow.clone(),
            flow_id: result.data.flow_id().map(String::from),
            status,
            completed_steps: result.completed_steps.clone(),
            failed_step: result.failed_step.clone(),
            error: result.error.clone(),
            duration_ms: result.duration.as_millis() as u64,
        }
    }
}

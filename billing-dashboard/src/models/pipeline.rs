use serde::{Deserialize, Serialize};

/// Audit row of one pipeline (DAG) run. Served newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: String,
    pub dag_id: String,
    pub status: String,
    pub created_ts: String,
}

impl PipelineRun {
    pub fn pipeline_status(&self) -> PipelineStatus {
        PipelineStatus::from_string(&self.status)
    }
}

/// Run status. Anything the audit table reports outside the known set is
/// shown as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Success,
    Failed,
    Running,
    Pending,
}

impl PipelineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatus::Success => "success",
            PipelineStatus::Failed => "failed",
            PipelineStatus::Running => "running",
            PipelineStatus::Pending => "pending",
        }
    }

    pub fn from_string(s: &str) -> Self {
        if s.eq_ignore_ascii_case("success") {
            PipelineStatus::Success
        } else if s.eq_ignore_ascii_case("failed") {
            PipelineStatus::Failed
        } else if s.eq_ignore_ascii_case("running") {
            PipelineStatus::Running
        } else {
            PipelineStatus::Pending
        }
    }
}

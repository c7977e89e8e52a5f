//! Pipeline run history.

use crate::format::format_timestamp;
use crate::models::{PipelineRun, PipelineStatus};
use crate::styles::{pipeline_icon, Tone};
use serde::Serialize;

pub const NO_RUNS: &str = "No pipeline runs found";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRunRow {
    pub run_id: String,
    pub dag_id: String,
    pub status: PipelineStatus,
    pub icon: &'static str,
    pub tone: Tone,
    pub created: String,
}

pub fn pipeline_rows(runs: &[PipelineRun]) -> Vec<PipelineRunRow> {
    runs.iter()
        .map(|run| {
            let status = run.pipeline_status();
            let badge = pipeline_icon(status);
            PipelineRunRow {
                run_id: run.run_id.clone(),
                dag_id: run.dag_id.clone(),
                status,
                icon: badge.icon,
                tone: badge.tone,
                created: format_timestamp(&run.created_ts),
            }
        })
        .collect()
}

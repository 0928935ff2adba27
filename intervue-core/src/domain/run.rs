//! Pipeline run types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::interview::ProcessingStatus;
use crate::domain::step::Step;

/// Which pipeline variant a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// Transcription, content, sentiment, relevance and flow
    Baseline,
    /// Baseline plus PII, encryption, flow graph, resume alignment and explainability
    Enhanced,
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineKind::Baseline => write!(f, "baseline"),
            PipelineKind::Enhanced => write!(f, "enhanced"),
        }
    }
}

impl std::str::FromStr for PipelineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseline" => Ok(PipelineKind::Baseline),
            "enhanced" => Ok(PipelineKind::Enhanced),
            other => Err(format!("unknown pipeline kind: {}", other)),
        }
    }
}

/// One invocation of the pipeline for one interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    pub interview_id: Uuid,
    pub run_id: Uuid,
    pub kind: PipelineKind,
    pub steps: Vec<Step>,
    pub status: ProcessingStatus,
    pub started_at: DateTime<Utc>,
    pub api_call_count: u32,
    pub token_count: u64,
}

impl PipelineRun {
    pub fn new(interview_id: Uuid, kind: PipelineKind, steps: Vec<Step>) -> Self {
        Self {
            interview_id,
            run_id: Uuid::new_v4(),
            kind,
            steps,
            status: ProcessingStatus::Processing,
            started_at: Utc::now(),
            api_call_count: 0,
            token_count: 0,
        }
    }
}

//! Pipeline monitoring records
//!
//! Append-only. One record per run, written once at the run's terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::run::PipelineKind;
use crate::domain::step::{Step, StepStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringStatus {
    Success,
    Error,
}

impl std::fmt::Display for MonitoringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitoringStatus::Success => write!(f, "success"),
            MonitoringStatus::Error => write!(f, "error"),
        }
    }
}

/// Per-step slice of a monitoring record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepBreakdown {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: Option<i64>,
    pub api_calls: u32,
    pub tokens_used: u64,
}

impl From<&Step> for StepBreakdown {
    fn from(step: &Step) -> Self {
        Self {
            name: step.name.clone(),
            status: step.status,
            duration_ms: step.duration_ms,
            api_calls: step.api_calls,
            tokens_used: step.tokens_used,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMonitoringRecord {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub run_id: Uuid,
    pub pipeline: PipelineKind,
    pub status: MonitoringStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub api_call_count: u32,
    pub token_count: u64,
    pub error_count: u32,
    pub failed_stage: Option<String>,
    pub error_message: Option<String>,
    pub steps: Vec<StepBreakdown>,
    pub created_at: DateTime<Utc>,
}

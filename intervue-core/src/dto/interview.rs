//! Interview DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::interview::{Interview, ProcessingStatus};
use crate::domain::run::PipelineKind;
use crate::domain::step::{Step, StepStatus};

/// Request to register a new interview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterview {
    pub candidate_name: Option<String>,
    pub audio_path: String,
    pub resume_text: Option<String>,
    pub job_description: String,
}

/// Interview summary for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    pub processing_status: ProcessingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for InterviewSummary {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            candidate_name: interview.candidate_name,
            processing_status: interview.processing_status,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}

/// Live progress view polled by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsView {
    pub interview_id: Uuid,
    pub processing_status: ProcessingStatus,
    pub steps: Vec<Step>,
    pub error_message: Option<String>,
}

impl StepsView {
    /// The step currently in flight, if any
    pub fn current(&self) -> Option<&Step> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Processing)
    }
}

impl From<Interview> for StepsView {
    fn from(interview: Interview) -> Self {
        Self {
            interview_id: interview.id,
            processing_status: interview.processing_status,
            steps: interview.steps,
            error_message: interview.error_message,
        }
    }
}

/// Response to a processing request; the run continues in the background
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingAccepted {
    pub interview_id: Uuid,
    pub run_id: Uuid,
    pub pipeline: PipelineKind,
}

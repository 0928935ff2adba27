//! Interview domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::step::Step;
use crate::domain::transcript::Transcript;

/// Interview record
///
/// The system of record for a recorded interview. The orchestrator is its only
/// writer while a run is in flight; pollers read `processing_status` and `steps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    pub candidate_name: Option<String>,
    /// Location of the recording, resolved by the transcription service
    pub audio_path: String,
    pub resume_text: Option<String>,
    pub job_description: String,
    pub processing_status: ProcessingStatus,
    pub steps: Vec<Step>,
    pub transcript: Option<Transcript>,
    /// Redacted transcript, encrypted by the vault
    pub encrypted_transcript: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Overall processing status of an interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Complete,
    Error,
}

impl ProcessingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessingStatus::Complete | ProcessingStatus::Error)
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Complete => write!(f, "complete"),
            ProcessingStatus::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "processing" => Ok(ProcessingStatus::Processing),
            "complete" => Ok(ProcessingStatus::Complete),
            "error" => Ok(ProcessingStatus::Error),
            other => Err(format!("unknown processing status: {}", other)),
        }
    }
}

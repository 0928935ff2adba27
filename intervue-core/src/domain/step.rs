//! Step domain types
//!
//! A step is the tracked, persisted status record of one pipeline stage or
//! stage group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a single pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Processing,
    Complete,
    Error,
}

impl StepStatus {
    /// Returns true once the step can no longer change within a run
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Complete | StepStatus::Error)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Processing => write!(f, "processing"),
            StepStatus::Complete => write!(f, "complete"),
            StepStatus::Error => write!(f, "error"),
        }
    }
}

/// A tracked pipeline step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Human-readable step name, shown to pollers
    pub name: String,

    pub status: StepStatus,

    /// Progress or failure message
    pub message: Option<String>,

    pub started_at: Option<DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,

    /// Wall-clock duration of the step in milliseconds
    pub duration_ms: Option<i64>,

    /// Number of external service calls made by this step
    #[serde(default)]
    pub api_calls: u32,

    /// Tokens reported by the external services for this step
    #[serde(default)]
    pub tokens_used: u64,

    /// Set when an optional stage degraded instead of failing the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Step {
    /// Creates a pending step with the given name
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Pending,
            message: None,
            started_at: None,
            completed_at: None,
            duration_ms: None,
            api_calls: 0,
            tokens_used: 0,
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!StepStatus::Pending.is_terminal());
        assert!(!StepStatus::Processing.is_terminal());
        assert!(StepStatus::Complete.is_terminal());
        assert!(StepStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&StepStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}

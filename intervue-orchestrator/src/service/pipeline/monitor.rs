//! Pipeline monitor
//!
//! Emits exactly one monitoring record per run at its terminal state.
//! Recording is best effort: a failed write is logged and swallowed so it
//! can never change the outcome of the run it describes.

use chrono::{DateTime, Utc};
use intervue_core::domain::monitoring::{MonitoringStatus, PipelineMonitoringRecord, StepBreakdown};
use intervue_core::domain::run::PipelineKind;
use intervue_core::domain::step::{Step, StepStatus};
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::InterviewStore;

/// Terminal state of a run, as handed to the monitor
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub interview_id: Uuid,
    pub run_id: Uuid,
    pub pipeline: PipelineKind,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<Step>,
    /// Error message when the run failed
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct PipelineMonitor {
    store: Arc<dyn InterviewStore>,
}

impl PipelineMonitor {
    pub fn new(store: Arc<dyn InterviewStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, outcome: &RunOutcome) {
        let record = build_record(outcome, Utc::now());

        tracing::info!(
            interview_id = %record.interview_id,
            run_id = %record.run_id,
            status = %record.status,
            duration_ms = record.duration_ms,
            api_calls = record.api_call_count,
            tokens = record.token_count,
            "Pipeline run finished"
        );

        if let Err(e) = self.store.create_pipeline_monitoring(&record).await {
            tracing::error!(
                interview_id = %record.interview_id,
                "Failed to record pipeline monitoring: {}",
                e
            );
        }
    }
}

/// Builds the monitoring record for a finished run
pub fn build_record(outcome: &RunOutcome, finished_at: DateTime<Utc>) -> PipelineMonitoringRecord {
    let failed = outcome
        .steps
        .iter()
        .filter(|s| s.status == StepStatus::Error)
        .collect::<Vec<_>>();

    let status = if outcome.error.is_some() || !failed.is_empty() {
        MonitoringStatus::Error
    } else {
        MonitoringStatus::Success
    };

    let error_count = match status {
        MonitoringStatus::Success => 0,
        MonitoringStatus::Error => failed.len().max(1) as u32,
    };

    PipelineMonitoringRecord {
        id: Uuid::new_v4(),
        interview_id: outcome.interview_id,
        run_id: outcome.run_id,
        pipeline: outcome.pipeline,
        status,
        started_at: outcome.started_at,
        duration_ms: (finished_at - outcome.started_at).num_milliseconds().max(0),
        api_call_count: outcome.steps.iter().map(|s| s.api_calls).sum(),
        token_count: outcome.steps.iter().map(|s| s.tokens_used).sum(),
        error_count,
        failed_stage: failed.first().map(|s| s.name.clone()),
        error_message: outcome.error.clone(),
        steps: outcome.steps.iter().map(StepBreakdown::from).collect(),
        created_at: finished_at,
    }
}

//! Repository Module
//!
//! Data access layer for the orchestrator.
//! Each Postgres repository handles database operations for a specific domain
//! entity; [`InterviewStore`] is the seam the pipeline and API depend on, with
//! a Postgres and an in-memory implementation.

pub mod interview;
pub mod lease;
pub mod memory;
pub mod monitoring;
pub mod report;

// Re-export for convenience
pub use interview as interview_repository;
pub use lease as lease_repository;
pub use memory::MemoryStore;
pub use monitoring as monitoring_repository;
pub use report as report_repository;

use async_trait::async_trait;
use intervue_core::domain::interview::{Interview, ProcessingStatus};
use intervue_core::domain::monitoring::PipelineMonitoringRecord;
use intervue_core::domain::report::{AnalysisReport, RecruiterMetrics};
use intervue_core::domain::step::Step;
use intervue_core::dto::interview::CreateInterview;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Longest lease a run may hold; longer TTLs are capped to this
pub const MAX_LEASE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Storage error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("interview {0} not found")]
    NotFound(Uuid),
}

/// Persistence collaborator for interviews and everything a run produces
#[async_trait]
pub trait InterviewStore: Send + Sync {
    async fn create_interview(&self, req: CreateInterview) -> Result<Interview, StoreError>;

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, StoreError>;

    async fn list_interviews(&self) -> Result<Vec<Interview>, StoreError>;

    /// Overwrites status, steps, transcript, ciphertext and error message
    async fn update_interview(&self, interview: &Interview) -> Result<(), StoreError>;

    /// Write-through of the latest step snapshot
    async fn save_progress(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        steps: &[Step],
        error_message: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn create_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError>;

    /// Latest report for an interview
    async fn get_report(&self, interview_id: Uuid) -> Result<Option<AnalysisReport>, StoreError>;

    async fn create_recruiter_metrics(&self, metrics: &RecruiterMetrics) -> Result<(), StoreError>;

    async fn create_pipeline_monitoring(
        &self,
        record: &PipelineMonitoringRecord,
    ) -> Result<(), StoreError>;

    /// Claims the interview for a run; false when a live lease is held by another run
    async fn acquire_lease(
        &self,
        interview_id: Uuid,
        run_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError>;

    /// Releases the lease if it is still held by `run_id`
    async fn release_lease(&self, interview_id: Uuid, run_id: Uuid) -> Result<(), StoreError>;
}

/// Postgres implementation of InterviewStore
#[derive(Clone)]
pub struct PgInterviewStore {
    pool: PgPool,
}

impl PgInterviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewStore for PgInterviewStore {
    async fn create_interview(&self, req: CreateInterview) -> Result<Interview, StoreError> {
        interview_repository::create(&self.pool, req).await
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, StoreError> {
        interview_repository::find_by_id(&self.pool, id).await
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>, StoreError> {
        interview_repository::list_all(&self.pool).await
    }

    async fn update_interview(&self, interview: &Interview) -> Result<(), StoreError> {
        interview_repository::update(&self.pool, interview).await
    }

    async fn save_progress(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        steps: &[Step],
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        interview_repository::save_progress(&self.pool, id, status, steps, error_message).await
    }

    async fn create_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError> {
        report_repository::create(&self.pool, report).await
    }

    async fn get_report(&self, interview_id: Uuid) -> Result<Option<AnalysisReport>, StoreError> {
        report_repository::find_latest(&self.pool, interview_id).await
    }

    async fn create_recruiter_metrics(&self, metrics: &RecruiterMetrics) -> Result<(), StoreError> {
        report_repository::create_recruiter_metrics(&self.pool, metrics).await
    }

    async fn create_pipeline_monitoring(
        &self,
        record: &PipelineMonitoringRecord,
    ) -> Result<(), StoreError> {
        monitoring_repository::create(&self.pool, record).await
    }

    async fn acquire_lease(
        &self,
        interview_id: Uuid,
        run_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        lease_repository::acquire(&self.pool, interview_id, run_id, ttl).await
    }

    async fn release_lease(&self, interview_id: Uuid, run_id: Uuid) -> Result<(), StoreError> {
        lease_repository::release(&self.pool, interview_id, run_id).await
    }
}

//! In-memory store
//!
//! Process-local implementation of [`InterviewStore`] for development
//! (`STORAGE_BACKEND=memory`) and tests. Every progress write is also kept
//! in a history so callers can inspect the sequence of persisted snapshots.

use async_trait::async_trait;
use chrono::Utc;
use intervue_core::domain::interview::{Interview, ProcessingStatus};
use intervue_core::domain::monitoring::PipelineMonitoringRecord;
use intervue_core::domain::report::{AnalysisReport, RecruiterMetrics};
use intervue_core::domain::step::Step;
use intervue_core::dto::interview::CreateInterview;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::repository::{InterviewStore, MAX_LEASE_TTL, StoreError};

#[derive(Default)]
struct State {
    interviews: HashMap<Uuid, Interview>,
    reports: Vec<AnalysisReport>,
    metrics: Vec<RecruiterMetrics>,
    monitoring: Vec<PipelineMonitoringRecord>,
    leases: HashMap<Uuid, (Uuid, Instant)>,
    history: HashMap<Uuid, Vec<Vec<Step>>>,
}

/// In-memory implementation of InterviewStore
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed interview, replacing any with the same id
    pub async fn insert(&self, interview: Interview) {
        let mut state = self.state.lock().await;
        state.interviews.insert(interview.id, interview);
    }

    /// Every step snapshot persisted for an interview, oldest first
    pub async fn progress_history(&self, interview_id: Uuid) -> Vec<Vec<Step>> {
        let state = self.state.lock().await;
        state
            .history
            .get(&interview_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn monitoring_records(&self) -> Vec<PipelineMonitoringRecord> {
        self.state.lock().await.monitoring.clone()
    }

    pub async fn recruiter_metrics(&self, interview_id: Uuid) -> Option<RecruiterMetrics> {
        let state = self.state.lock().await;
        state
            .metrics
            .iter()
            .rev()
            .find(|m| m.interview_id == interview_id)
            .cloned()
    }

    /// Whether a live lease exists for the interview
    pub async fn is_leased(&self, interview_id: Uuid) -> bool {
        let state = self.state.lock().await;
        state
            .leases
            .get(&interview_id)
            .is_some_and(|(_, expires)| *expires > Instant::now())
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn create_interview(&self, req: CreateInterview) -> Result<Interview, StoreError> {
        let now = Utc::now();
        let interview = Interview {
            id: Uuid::new_v4(),
            candidate_name: req.candidate_name,
            audio_path: req.audio_path,
            resume_text: req.resume_text,
            job_description: req.job_description,
            processing_status: ProcessingStatus::Pending,
            steps: Vec::new(),
            transcript: None,
            encrypted_transcript: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };

        self.insert(interview.clone()).await;
        Ok(interview)
    }

    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>, StoreError> {
        Ok(self.state.lock().await.interviews.get(&id).cloned())
    }

    async fn list_interviews(&self) -> Result<Vec<Interview>, StoreError> {
        let state = self.state.lock().await;
        let mut interviews: Vec<Interview> = state.interviews.values().cloned().collect();
        interviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(interviews)
    }

    async fn update_interview(&self, interview: &Interview) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let stored = state
            .interviews
            .get_mut(&interview.id)
            .ok_or(StoreError::NotFound(interview.id))?;

        stored.processing_status = interview.processing_status;
        stored.steps = interview.steps.clone();
        stored.transcript = interview.transcript.clone();
        stored.encrypted_transcript = interview.encrypted_transcript.clone();
        stored.error_message = interview.error_message.clone();
        stored.updated_at = Utc::now();

        state
            .history
            .entry(interview.id)
            .or_default()
            .push(interview.steps.clone());
        Ok(())
    }

    async fn save_progress(
        &self,
        id: Uuid,
        status: ProcessingStatus,
        steps: &[Step],
        error_message: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let stored = state
            .interviews
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        stored.processing_status = status;
        stored.steps = steps.to_vec();
        stored.error_message = error_message.map(str::to_string);
        stored.updated_at = Utc::now();

        state.history.entry(id).or_default().push(steps.to_vec());
        Ok(())
    }

    async fn create_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError> {
        self.state.lock().await.reports.push(report.clone());
        Ok(())
    }

    async fn get_report(&self, interview_id: Uuid) -> Result<Option<AnalysisReport>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .reports
            .iter()
            .rev()
            .find(|r| r.interview_id == interview_id)
            .cloned())
    }

    async fn create_recruiter_metrics(&self, metrics: &RecruiterMetrics) -> Result<(), StoreError> {
        self.state.lock().await.metrics.push(metrics.clone());
        Ok(())
    }

    async fn create_pipeline_monitoring(
        &self,
        record: &PipelineMonitoringRecord,
    ) -> Result<(), StoreError> {
        self.state.lock().await.monitoring.push(record.clone());
        Ok(())
    }

    async fn acquire_lease(
        &self,
        interview_id: Uuid,
        run_id: Uuid,
        ttl: Duration,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if let Some((holder, expires)) = state.leases.get(&interview_id)
            && *holder != run_id
            && *expires > now
        {
            return Ok(false);
        }

        state
            .leases
            .insert(interview_id, (run_id, now + ttl.min(MAX_LEASE_TTL)));
        Ok(true)
    }

    async fn release_lease(&self, interview_id: Uuid, run_id: Uuid) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state
            .leases
            .get(&interview_id)
            .is_some_and(|(holder, _)| *holder == run_id)
        {
            state.leases.remove(&interview_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateInterview {
        CreateInterview {
            candidate_name: Some("Ada".to_string()),
            audio_path: "s3://recordings/ada.wav".to_string(),
            resume_text: None,
            job_description: "Backend engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lease_excludes_second_run() {
        let store = MemoryStore::new();
        let interview_id = Uuid::new_v4();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        let ttl = Duration::from_secs(60);

        assert!(store.acquire_lease(interview_id, first, ttl).await.unwrap());
        assert!(!store.acquire_lease(interview_id, second, ttl).await.unwrap());

        // Only the holder can release
        store.release_lease(interview_id, second).await.unwrap();
        assert!(store.is_leased(interview_id).await);

        store.release_lease(interview_id, first).await.unwrap();
        assert!(store.acquire_lease(interview_id, second, ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_lease_can_be_taken_over() {
        let store = MemoryStore::new();
        let interview_id = Uuid::new_v4();

        assert!(
            store
                .acquire_lease(interview_id, Uuid::new_v4(), Duration::ZERO)
                .await
                .unwrap()
        );
        assert!(
            store
                .acquire_lease(interview_id, Uuid::new_v4(), Duration::from_secs(60))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_oversized_lease_ttl_is_capped() {
        let store = MemoryStore::new();
        let interview_id = Uuid::new_v4();

        assert!(
            store
                .acquire_lease(interview_id, Uuid::new_v4(), Duration::from_secs(u64::MAX))
                .await
                .unwrap()
        );
        assert!(store.is_leased(interview_id).await);
        assert!(
            !store
                .acquire_lease(interview_id, Uuid::new_v4(), Duration::from_secs(60))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_save_progress_records_history() {
        let store = MemoryStore::new();
        let interview = store.create_interview(create_request()).await.unwrap();
        let steps = vec![Step::pending("Transcription")];

        store
            .save_progress(interview.id, ProcessingStatus::Processing, &steps, None)
            .await
            .unwrap();

        let stored = store.get_interview(interview.id).await.unwrap().unwrap();
        assert_eq!(stored.processing_status, ProcessingStatus::Processing);
        assert_eq!(store.progress_history(interview.id).await, vec![steps]);
    }

    #[tokio::test]
    async fn test_save_progress_unknown_interview() {
        let store = MemoryStore::new();
        let result = store
            .save_progress(Uuid::new_v4(), ProcessingStatus::Error, &[], Some("boom"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}

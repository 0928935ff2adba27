//! Interview-related API endpoints

use crate::OrchestratorClient;
use crate::error::Result;
use intervue_core::domain::interview::Interview;
use intervue_core::domain::report::AnalysisReport;
use intervue_core::dto::interview::{
    CreateInterview, InterviewSummary, ProcessingAccepted, StepsView,
};
use std::time::Duration;
use uuid::Uuid;

impl OrchestratorClient {
    // =============================================================================
    // Interview Management
    // =============================================================================

    /// Register a new interview
    pub async fn create_interview(&self, req: CreateInterview) -> Result<Interview> {
        let url = format!("{}/interview/create", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// List all interviews, newest first
    pub async fn list_interviews(&self) -> Result<Vec<InterviewSummary>> {
        let url = format!("{}/interview/list", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get an interview by ID
    pub async fn get_interview(&self, id: Uuid) -> Result<Interview> {
        let url = format!("{}/interview/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the current step list of an interview
    pub async fn get_steps(&self, id: Uuid) -> Result<StepsView> {
        let url = format!("{}/interview/{}/steps", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the latest analysis report of an interview
    pub async fn get_report(&self, id: Uuid) -> Result<AnalysisReport> {
        let url = format!("{}/interview/{}/report", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Processing
    // =============================================================================

    /// Request a processing run; returns once the run has been accepted
    ///
    /// A run already in flight for the interview yields a 409 [`crate::ClientError::ApiError`].
    pub async fn process_interview(&self, id: Uuid, enhanced: bool) -> Result<ProcessingAccepted> {
        let endpoint = if enhanced { "process-enhanced" } else { "process" };
        let url = format!("{}/interview/{}/{}", self.base_url, id, endpoint);
        tracing::debug!("Requesting {} run for interview {}", endpoint, id);
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    /// Poll the step list until the interview reaches a terminal status
    ///
    /// `on_update` is called with every polled view, including the last one.
    pub async fn watch_steps<F>(&self, id: Uuid, interval: Duration, mut on_update: F) -> Result<StepsView>
    where
        F: FnMut(&StepsView),
    {
        loop {
            let view = self.get_steps(id).await?;
            on_update(&view);

            tracing::trace!("Interview {} is {}", id, view.processing_status);
            if view.processing_status.is_terminal() {
                return Ok(view);
            }

            tokio::time::sleep(interval).await;
        }
    }
}

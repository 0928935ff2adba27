//! Interview Service
//!
//! Business logic for registering interviews and reading their progress
//! and reports.

use intervue_core::domain::interview::Interview;
use intervue_core::domain::report::AnalysisReport;
use intervue_core::dto::interview::{CreateInterview, InterviewSummary, StepsView};
use uuid::Uuid;

use crate::repository::{InterviewStore, StoreError};

/// Service error type
#[derive(Debug)]
pub enum InterviewError {
    NotFound(Uuid),
    ReportNotFound(Uuid),
    ValidationError(String),
    StoreError(StoreError),
}

impl From<StoreError> for InterviewError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => InterviewError::NotFound(id),
            other => InterviewError::StoreError(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, InterviewError>;

/// Register a new interview; processing is requested separately
pub async fn create_interview(store: &dyn InterviewStore, req: CreateInterview) -> Result<Interview> {
    validate_create_request(&req)?;

    let interview = store.create_interview(req).await?;

    tracing::info!("Interview created: {}", interview.id);

    Ok(interview)
}

/// Get an interview by ID
pub async fn get_interview(store: &dyn InterviewStore, id: Uuid) -> Result<Interview> {
    let interview = store
        .get_interview(id)
        .await?
        .ok_or(InterviewError::NotFound(id))?;

    Ok(interview)
}

/// List all interviews, newest first
pub async fn list_interviews(store: &dyn InterviewStore) -> Result<Vec<InterviewSummary>> {
    let interviews = store.list_interviews().await?;
    Ok(interviews.into_iter().map(InterviewSummary::from).collect())
}

/// Current step list of an interview
pub async fn get_steps(store: &dyn InterviewStore, id: Uuid) -> Result<StepsView> {
    get_interview(store, id).await.map(StepsView::from)
}

/// Latest report of an interview
pub async fn get_report(store: &dyn InterviewStore, id: Uuid) -> Result<AnalysisReport> {
    // Distinguish a missing interview from one without a report yet
    get_interview(store, id).await?;

    let report = store
        .get_report(id)
        .await?
        .ok_or(InterviewError::ReportNotFound(id))?;

    Ok(report)
}

/// Validate an interview creation request
fn validate_create_request(req: &CreateInterview) -> Result<()> {
    if req.audio_path.trim().is_empty() {
        return Err(InterviewError::ValidationError(
            "Audio path cannot be empty".to_string(),
        ));
    }

    if req.job_description.trim().is_empty() {
        return Err(InterviewError::ValidationError(
            "Job description cannot be empty".to_string(),
        ));
    }

    if let Some(name) = &req.candidate_name
        && name.trim().is_empty()
    {
        return Err(InterviewError::ValidationError(
            "Candidate name cannot be blank".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn request() -> CreateInterview {
        CreateInterview {
            candidate_name: Some("Dana Reyes".to_string()),
            audio_path: "s3://interviews/dana.wav".to_string(),
            resume_text: None,
            job_description: "Senior backend engineer, payments".to_string(),
        }
    }

    #[test]
    fn test_validate_empty_audio_path() {
        let req = CreateInterview {
            audio_path: " ".to_string(),
            ..request()
        };

        let result = validate_create_request(&req);
        assert!(matches!(result, Err(InterviewError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_job_description() {
        let req = CreateInterview {
            job_description: "".to_string(),
            ..request()
        };

        let result = validate_create_request(&req);
        assert!(matches!(result, Err(InterviewError::ValidationError(_))));
    }

    #[test]
    fn test_validate_valid_request() {
        assert!(validate_create_request(&request()).is_ok());
    }

    #[tokio::test]
    async fn test_report_missing_for_unprocessed_interview() {
        let store = MemoryStore::new();
        let interview = create_interview(&store, request()).await.unwrap();

        let result = get_report(&store, interview.id).await;
        assert!(matches!(result, Err(InterviewError::ReportNotFound(id)) if id == interview.id));

        let result = get_report(&store, Uuid::new_v4()).await;
        assert!(matches!(result, Err(InterviewError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_new_interview_has_no_steps() {
        let store = MemoryStore::new();
        let interview = create_interview(&store, request()).await.unwrap();

        let view = get_steps(&store, interview.id).await.unwrap();
        assert!(view.steps.is_empty());
        assert!(view.current().is_none());

        let list = list_interviews(&store).await.unwrap();
        assert_eq!(list.len(), 1);
    }
}

//! Interview API Handlers
//!
//! HTTP endpoints for registering interviews, polling their progress and
//! requesting processing runs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use intervue_core::domain::interview::Interview;
use intervue_core::domain::report::AnalysisReport;
use intervue_core::domain::run::PipelineKind;
use intervue_core::dto::interview::{
    CreateInterview, InterviewSummary, ProcessingAccepted, StepsView,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};
use crate::service::interview_service::{self, InterviewError};
use crate::service::pipeline::PipelineError;

impl From<InterviewError> for ApiError {
    fn from(err: InterviewError) -> Self {
        match err {
            InterviewError::NotFound(id) => {
                ApiError::NotFound(format!("Interview {} not found", id))
            }
            InterviewError::ReportNotFound(id) => {
                ApiError::NotFound(format!("No report for interview {} yet", id))
            }
            InterviewError::ValidationError(msg) => ApiError::BadRequest(msg),
            InterviewError::StoreError(err) => ApiError::StoreError(err),
        }
    }
}

// =============================================================================
// Interview Endpoints
// =============================================================================

/// POST /interview/create
/// Register a new interview
pub async fn create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterview>,
) -> ApiResult<(StatusCode, Json<Interview>)> {
    tracing::info!("Creating interview for audio: {}", req.audio_path);

    let interview = interview_service::create_interview(state.store.as_ref(), req).await?;

    Ok((StatusCode::CREATED, Json(interview)))
}

/// GET /interview/list
pub async fn list_interviews(State(state): State<AppState>) -> ApiResult<Json<Vec<InterviewSummary>>> {
    tracing::debug!("Listing interviews");

    let interviews = interview_service::list_interviews(state.store.as_ref()).await?;

    Ok(Json(interviews))
}

/// GET /interview/{id}
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Interview>> {
    tracing::debug!("Getting interview: {}", id);

    let interview = interview_service::get_interview(state.store.as_ref(), id).await?;

    Ok(Json(interview))
}

/// GET /interview/{id}/steps
/// Current step list; polled by clients while a run is in flight
pub async fn get_steps(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StepsView>> {
    let steps = interview_service::get_steps(state.store.as_ref(), id).await?;

    Ok(Json(steps))
}

/// GET /interview/{id}/report
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AnalysisReport>> {
    tracing::debug!("Getting report for interview: {}", id);

    let report = interview_service::get_report(state.store.as_ref(), id).await?;

    Ok(Json(report))
}

// =============================================================================
// Processing Endpoints
// =============================================================================

/// POST /interview/{id}/process
/// Start a baseline run in the background
pub async fn process_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ProcessingAccepted>)> {
    launch(state, PipelineKind::Baseline, id).await
}

/// POST /interview/{id}/process-enhanced
/// Start an enhanced run in the background
pub async fn process_enhanced_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ProcessingAccepted>)> {
    launch(state, PipelineKind::Enhanced, id).await
}

async fn launch(
    state: AppState,
    kind: PipelineKind,
    id: Uuid,
) -> ApiResult<(StatusCode, Json<ProcessingAccepted>)> {
    tracing::info!("Processing requested for interview {} ({})", id, kind);

    let accepted = state
        .orchestrator
        .launch(kind, id)
        .await
        .map_err(|e| match e {
            PipelineError::NotFound(id) => {
                ApiError::NotFound(format!("Interview {} not found", id))
            }
            PipelineError::AlreadyRunning(id) => {
                ApiError::Conflict(format!("Interview {} is already being processed", id))
            }
            PipelineError::InvalidInput(msg) => ApiError::BadRequest(msg),
            PipelineError::Store(err) => ApiError::StoreError(err),
            other => ApiError::InternalError(other.to_string()),
        })?;

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

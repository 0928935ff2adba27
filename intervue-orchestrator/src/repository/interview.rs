//! Interview Repository
//!
//! Handles all database operations related to interviews, including the
//! write-through progress updates issued by the pipeline.

use chrono::{DateTime, Utc};
use intervue_core::domain::interview::{Interview, ProcessingStatus};
use intervue_core::domain::step::Step;
use intervue_core::domain::transcript::Transcript;
use intervue_core::dto::interview::CreateInterview;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::repository::StoreError;

/// Create a new interview in the database
pub async fn create(pool: &PgPool, req: CreateInterview) -> Result<Interview, StoreError> {
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

    sqlx::query(
        r#"
        INSERT INTO interviews (id, candidate_name, audio_path, resume_text, job_description,
                                processing_status, steps, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(interview.id)
    .bind(&interview.candidate_name)
    .bind(&interview.audio_path)
    .bind(&interview.resume_text)
    .bind(&interview.job_description)
    .bind(interview.processing_status.to_string())
    .bind(Json(&interview.steps))
    .bind(interview.created_at)
    .bind(interview.updated_at)
    .execute(pool)
    .await?;

    Ok(interview)
}

/// Find an interview by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Interview>, StoreError> {
    let row = sqlx::query_as::<_, InterviewRow>(
        r#"
        SELECT id, candidate_name, audio_path, resume_text, job_description,
               processing_status, steps, transcript, encrypted_transcript,
               error_message, created_at, updated_at
        FROM interviews
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all interviews, newest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<Interview>, StoreError> {
    let rows = sqlx::query_as::<_, InterviewRow>(
        r#"
        SELECT id, candidate_name, audio_path, resume_text, job_description,
               processing_status, steps, transcript, encrypted_transcript,
               error_message, created_at, updated_at
        FROM interviews
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Overwrite the mutable fields of an interview
pub async fn update(pool: &PgPool, interview: &Interview) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE interviews
        SET processing_status = $1, steps = $2, transcript = $3,
            encrypted_transcript = $4, error_message = $5, updated_at = $6
        WHERE id = $7
        "#,
    )
    .bind(interview.processing_status.to_string())
    .bind(Json(&interview.steps))
    .bind(interview.transcript.as_ref().map(Json))
    .bind(&interview.encrypted_transcript)
    .bind(&interview.error_message)
    .bind(Utc::now())
    .bind(interview.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(interview.id));
    }

    Ok(())
}

/// Persist the status and step snapshot of a running pipeline
pub async fn save_progress(
    pool: &PgPool,
    id: Uuid,
    status: ProcessingStatus,
    steps: &[Step],
    error_message: Option<&str>,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE interviews
        SET processing_status = $1, steps = $2, error_message = $3, updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(status.to_string())
    .bind(Json(steps))
    .bind(error_message)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id));
    }

    Ok(())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct InterviewRow {
    id: Uuid,
    candidate_name: Option<String>,
    audio_path: String,
    resume_text: Option<String>,
    job_description: String,
    processing_status: String,
    steps: Json<Vec<Step>>,
    transcript: Option<Json<Transcript>>,
    encrypted_transcript: Option<String>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InterviewRow> for Interview {
    fn from(row: InterviewRow) -> Self {
        let processing_status = row.processing_status.parse().unwrap_or_else(|e| {
            tracing::warn!("Interview {} has {}; treating as error", row.id, e);
            ProcessingStatus::Error
        });

        Interview {
            id: row.id,
            candidate_name: row.candidate_name,
            audio_path: row.audio_path,
            resume_text: row.resume_text,
            job_description: row.job_description,
            processing_status,
            steps: row.steps.0,
            transcript: row.transcript.map(|t| t.0),
            encrypted_transcript: row.encrypted_transcript,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

//! Report Repository
//!
//! Stores aggregated analysis reports and the recruiter metrics derived
//! alongside them.

use intervue_core::domain::report::{AnalysisReport, RecruiterMetrics};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::repository::StoreError;

/// Insert an analysis report
pub async fn create(pool: &PgPool, report: &AnalysisReport) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO analysis_reports (id, interview_id, pipeline, report, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(report.id)
    .bind(report.interview_id)
    .bind(report.pipeline.to_string())
    .bind(Json(report))
    .bind(report.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Find the most recent report for an interview
pub async fn find_latest(
    pool: &PgPool,
    interview_id: Uuid,
) -> Result<Option<AnalysisReport>, StoreError> {
    let row: Option<(Json<AnalysisReport>,)> = sqlx::query_as(
        r#"
        SELECT report
        FROM analysis_reports
        WHERE interview_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(interview_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(report,)| report.0))
}

/// Insert recruiter metrics for a completed run
pub async fn create_recruiter_metrics(
    pool: &PgPool,
    metrics: &RecruiterMetrics,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO recruiter_metrics (interview_id, question_count, answer_count, talk_ratio,
                                       avg_answer_words, follow_up_rate, missed_follow_up_count,
                                       created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(metrics.interview_id)
    .bind(metrics.question_count as i32)
    .bind(metrics.answer_count as i32)
    .bind(metrics.talk_ratio)
    .bind(metrics.avg_answer_words)
    .bind(metrics.follow_up_rate)
    .bind(metrics.missed_follow_up_count as i32)
    .bind(metrics.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

//! Monitoring Repository
//!
//! Append-only storage for per-run monitoring records.

use intervue_core::domain::monitoring::PipelineMonitoringRecord;
use sqlx::PgPool;
use sqlx::types::Json;

use crate::repository::StoreError;

/// Insert a monitoring record
pub async fn create(pool: &PgPool, record: &PipelineMonitoringRecord) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO pipeline_monitoring (id, interview_id, run_id, pipeline, status, started_at,
                                         duration_ms, api_call_count, token_count, error_count,
                                         failed_stage, error_message, steps, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(record.id)
    .bind(record.interview_id)
    .bind(record.run_id)
    .bind(record.pipeline.to_string())
    .bind(record.status.to_string())
    .bind(record.started_at)
    .bind(record.duration_ms)
    .bind(record.api_call_count as i32)
    .bind(record.token_count as i64)
    .bind(record.error_count as i32)
    .bind(&record.failed_stage)
    .bind(&record.error_message)
    .bind(Json(&record.steps))
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

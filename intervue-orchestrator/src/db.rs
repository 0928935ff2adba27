use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create interviews table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interviews (
            id UUID PRIMARY KEY,
            candidate_name VARCHAR(255),
            audio_path TEXT NOT NULL,
            resume_text TEXT,
            job_description TEXT NOT NULL,
            processing_status VARCHAR(20) NOT NULL,
            steps JSONB NOT NULL DEFAULT '[]',
            transcript JSONB,
            encrypted_transcript TEXT,
            error_message TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create analysis reports table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_reports (
            id UUID PRIMARY KEY,
            interview_id UUID NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
            pipeline VARCHAR(20) NOT NULL,
            report JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create recruiter metrics table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recruiter_metrics (
            id SERIAL PRIMARY KEY,
            interview_id UUID NOT NULL REFERENCES interviews(id) ON DELETE CASCADE,
            question_count INTEGER NOT NULL,
            answer_count INTEGER NOT NULL,
            talk_ratio DOUBLE PRECISION NOT NULL,
            avg_answer_words DOUBLE PRECISION NOT NULL,
            follow_up_rate DOUBLE PRECISION NOT NULL,
            missed_follow_up_count INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create pipeline monitoring table (append-only)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipeline_monitoring (
            id UUID PRIMARY KEY,
            interview_id UUID NOT NULL,
            run_id UUID NOT NULL,
            pipeline VARCHAR(20) NOT NULL,
            status VARCHAR(20) NOT NULL,
            started_at TIMESTAMPTZ NOT NULL,
            duration_ms BIGINT NOT NULL,
            api_call_count INTEGER NOT NULL,
            token_count BIGINT NOT NULL,
            error_count INTEGER NOT NULL,
            failed_stage VARCHAR(255),
            error_message TEXT,
            steps JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create run lease table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interview_leases (
            interview_id UUID PRIMARY KEY,
            run_id UUID NOT NULL,
            acquired_at TIMESTAMPTZ NOT NULL,
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for better query performance
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_interviews_created_at ON interviews(created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_reports_interview_id ON analysis_reports(interview_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_monitoring_interview_id ON pipeline_monitoring(interview_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

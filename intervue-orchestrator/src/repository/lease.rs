//! Lease Repository
//!
//! Per-interview run leases. A lease row is taken over only once it has
//! expired, so at most one live run writes to an interview.

use chrono::Utc;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::repository::{MAX_LEASE_TTL, StoreError};

/// Try to acquire the lease for an interview; returns false if another run holds it
pub async fn acquire(
    pool: &PgPool,
    interview_id: Uuid,
    run_id: Uuid,
    ttl: Duration,
) -> Result<bool, StoreError> {
    let now = Utc::now();
    let ttl = chrono::Duration::from_std(ttl.min(MAX_LEASE_TTL))
        .unwrap_or_else(|_| chrono::Duration::days(1));
    let expires_at = now + ttl;

    let acquired: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO interview_leases (interview_id, run_id, acquired_at, expires_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (interview_id) DO UPDATE
        SET run_id = EXCLUDED.run_id,
            acquired_at = EXCLUDED.acquired_at,
            expires_at = EXCLUDED.expires_at
        WHERE interview_leases.expires_at < $3
        RETURNING run_id
        "#,
    )
    .bind(interview_id)
    .bind(run_id)
    .bind(now)
    .bind(expires_at)
    .fetch_optional(pool)
    .await?;

    Ok(acquired.is_some_and(|(holder,)| holder == run_id))
}

/// Release a lease held by the given run
pub async fn release(pool: &PgPool, interview_id: Uuid, run_id: Uuid) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM interview_leases WHERE interview_id = $1 AND run_id = $2")
        .bind(interview_id)
        .bind(run_id)
        .execute(pool)
        .await?;

    Ok(())
}

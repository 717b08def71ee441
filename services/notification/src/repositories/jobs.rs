//! Durable job queue backed by the `notification_jobs` table
//!
//! Workers claim with `FOR UPDATE SKIP LOCKED`, so several processes can
//! drain the same table without handing a job out twice. A claim is a lease:
//! a job left `processing` past its `run_at` is handed out again.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::job::{CLAIM_LEASE_SECS, JobStatus, NewJob, NotificationJob};

/// Consumer side of the job table
///
/// Jobs are inserted together with their notification by
/// [`NotificationRepository::create_queued`](super::NotificationRepository::create_queued).
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Take the oldest eligible job, mark it `processing` and count the attempt
    ///
    /// Eligible means `queued` and due, or `processing` with an expired lease.
    /// The claimed job's `run_at` becomes the end of its lease.
    async fn claim_next(&self) -> Result<Option<NotificationJob>>;

    async fn mark_done(&self, id: Uuid) -> Result<()>;

    /// Put a failed job back in the queue, eligible from `run_at`
    async fn reschedule(&self, id: Uuid, run_at: DateTime<Utc>, error: &str) -> Result<()>;

    /// Keep the job as a dead letter
    async fn mark_dead(&self, id: Uuid, error: &str) -> Result<()>;
}

const JOB_COLUMNS: &str = "id, name, notification_id, payload, attempts_made, max_attempts, \
     backoff_delay_ms, status, last_error, run_at, created_at, updated_at";

/// Insert a queued job, eligible immediately
pub(crate) async fn insert_job<'e>(
    executor: impl PgExecutor<'e>,
    job: &NewJob,
) -> Result<NotificationJob> {
    let job = sqlx::query_as::<_, NotificationJob>(&format!(
        r#"
        INSERT INTO notification_jobs (name, notification_id, payload, max_attempts,
                                       backoff_delay_ms)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {JOB_COLUMNS}
        "#
    ))
    .bind(&job.name)
    .bind(job.notification_id)
    .bind(&job.payload)
    .bind(job.max_attempts)
    .bind(job.backoff_delay_ms)
    .fetch_one(executor)
    .await?;

    debug!(job_id = %job.id, "Job enqueued");
    Ok(job)
}

/// PostgreSQL-backed job queue
#[derive(Clone)]
pub struct PgJobQueue {
    pool: PgPool,
}

impl PgJobQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn finish(
        &self,
        id: Uuid,
        status: JobStatus,
        run_at: Option<DateTime<Utc>>,
        error: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_jobs SET
                status = $2,
                run_at = COALESCE($3, run_at),
                last_error = COALESCE($4, last_error),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(run_at)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn claim_next(&self) -> Result<Option<NotificationJob>> {
        let job = sqlx::query_as::<_, NotificationJob>(&format!(
            r#"
            UPDATE notification_jobs SET
                status = 'processing',
                attempts_made = attempts_made + 1,
                run_at = NOW() + make_interval(secs => $1),
                updated_at = NOW()
            WHERE id = (
                SELECT id FROM notification_jobs
                WHERE status IN ('queued', 'processing') AND run_at <= NOW()
                ORDER BY run_at, created_at
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(CLAIM_LEASE_SECS as f64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    async fn mark_done(&self, id: Uuid) -> Result<()> {
        self.finish(id, JobStatus::Done, None, None).await
    }

    async fn reschedule(&self, id: Uuid, run_at: DateTime<Utc>, error: &str) -> Result<()> {
        self.finish(id, JobStatus::Queued, Some(run_at), Some(error))
            .await
    }

    async fn mark_dead(&self, id: Uuid, error: &str) -> Result<()> {
        self.finish(id, JobStatus::Dead, None, Some(error)).await
    }
}

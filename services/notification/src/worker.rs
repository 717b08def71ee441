//! Background consumer of the notification job table
//!
//! A cron job ticks on a schedule and drains every eligible job, one at a
//! time. Overlapping ticks are skipped.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::{
    dispatcher::NotificationSender,
    models::job::{NotificationJob, NotificationPayload, RetryDecision},
    repositories::jobs::JobQueue,
};

/// Worker settings
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    pub worker_enabled: bool,
    pub poll_schedule: String,
}

impl WorkerConfig {
    /// Load from the environment
    ///
    /// # Environment Variables
    /// - `NOTIFICATION_WORKER_ENABLED`: run the worker in this process (default: true)
    /// - `NOTIFICATION_POLL_SCHEDULE`: cron expression with seconds (default: every second)
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("worker_enabled", true)?
            .set_default("poll_schedule", "* * * * * *")?
            .add_source(
                Environment::with_prefix("NOTIFICATION")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Outcome of one processed job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Done,
    Retried,
    Dead,
}

#[derive(Clone)]
pub struct NotificationWorker {
    queue: Arc<dyn JobQueue>,
    sender: Arc<dyn NotificationSender>,
    running: Arc<Mutex<()>>,
}

impl NotificationWorker {
    pub fn new(queue: Arc<dyn JobQueue>, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            queue,
            sender,
            running: Arc::new(Mutex::new(())),
        }
    }

    /// Claim and process a single job, `None` when nothing is eligible
    pub async fn process_next(&self) -> Result<Option<JobOutcome>> {
        let Some(job) = self.queue.claim_next().await? else {
            return Ok(None);
        };

        info!(
            job_id = %job.id,
            notification_id = %job.notification_id,
            attempt = job.attempts_made,
            "Processing notification job"
        );

        if job.is_exhausted() {
            error!(
                job_id = %job.id,
                attempt = job.attempts_made,
                "Notification job lease expired on its last attempt"
            );
            self.queue
                .mark_dead(job.id, "Claim expired after the last attempt")
                .await?;
            return Ok(Some(JobOutcome::Dead));
        }

        let payload: NotificationPayload = match serde_json::from_value(job.payload.clone()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(job_id = %job.id, "Unknown notification payload: {}", e);
                self.queue
                    .mark_dead(job.id, &format!("Unknown notification payload: {e}"))
                    .await?;
                return Ok(Some(JobOutcome::Dead));
            }
        };

        match self.sender.send(&payload).await {
            Ok(()) => {
                self.queue.mark_done(job.id).await?;
                info!(job_id = %job.id, "Notification job completed");
                Ok(Some(JobOutcome::Done))
            }
            Err(e) => self.fail(&job, &e.to_string()).await.map(Some),
        }
    }

    async fn fail(&self, job: &NotificationJob, reason: &str) -> Result<JobOutcome> {
        match job.after_failure(Utc::now()) {
            RetryDecision::Retry(run_at) => {
                warn!(
                    job_id = %job.id,
                    attempt = job.attempts_made,
                    max_attempts = job.max_attempts,
                    "Notification job failed, retrying at {}: {}",
                    run_at,
                    reason
                );
                self.queue.reschedule(job.id, run_at, reason).await?;
                Ok(JobOutcome::Retried)
            }
            RetryDecision::Dead => {
                error!(
                    job_id = %job.id,
                    attempt = job.attempts_made,
                    "Notification job exhausted its attempts: {}",
                    reason
                );
                self.queue.mark_dead(job.id, reason).await?;
                Ok(JobOutcome::Dead)
            }
        }
    }

    /// Process jobs until none is eligible, returning how many were handled
    pub async fn drain(&self) -> Result<usize> {
        let mut processed = 0;
        while self.process_next().await?.is_some() {
            processed += 1;
        }
        Ok(processed)
    }

    /// One scheduler tick; skipped while a previous drain still runs
    pub async fn tick(&self) {
        let Ok(_guard) = self.running.try_lock() else {
            return;
        };

        match self.drain().await {
            Ok(0) => {}
            Ok(count) => info!("Processed {} notification jobs", count),
            Err(e) => error!("Failed to process notification jobs: {}", e),
        }
    }

    /// Register the tick on a cron schedule and start the scheduler
    pub async fn start(&self, schedule: &str) -> Result<JobScheduler> {
        let worker = self.clone();

        let scheduler = JobScheduler::new().await?;

        let job = Job::new_async(schedule, move |_, _| {
            let worker = worker.clone();
            Box::pin(async move {
                worker.tick().await;
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("Started notification worker with schedule: {}", schedule);
        Ok(scheduler)
    }
}

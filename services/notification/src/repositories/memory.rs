use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{NotificationRepository, jobs::JobQueue};
use crate::models::{
    CreateNotificationRequest, Notification,
    job::{CLAIM_LEASE_SECS, JobStatus, NewJob, NotificationJob},
};

/// In-memory notifications for service tests, queueing into `queue`
pub struct InMemoryNotificationRepository {
    rows: Mutex<Vec<Notification>>,
    queue: Arc<InMemoryJobQueue>,
}

impl InMemoryNotificationRepository {
    pub fn new(queue: Arc<InMemoryJobQueue>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            queue,
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create_queued(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<(Notification, NotificationJob)> {
        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: request.user_id.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            notification_type: request.notification_type,
            is_read: false,
            created_at: now,
            updated_at: now,
        };

        // nothing is kept unless the job is accepted
        let job = self.queue.push(&NewJob::deliver(&notification)?)?;
        self.rows.lock().unwrap().push(notification.clone());
        Ok((notification, job))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_unread_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .cloned()
            .collect())
    }

    async fn count_unread_by_user(&self, user_id: &str) -> Result<i64> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn update_read_status(&self, id: Uuid, is_read: bool) -> Result<Option<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.iter_mut().find(|n| n.id == id).map(|n| {
            n.is_read = is_read;
            n.updated_at = Utc::now();
            n.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Notification>> {
        let mut rows = self.rows.lock().unwrap();
        let position = rows.iter().position(|n| n.id == id);
        Ok(position.map(|i| rows.remove(i)))
    }
}

/// In-memory job queue; eligibility is judged against the wall clock
#[derive(Default)]
pub struct InMemoryJobQueue {
    jobs: Mutex<Vec<NotificationJob>>,
    rejecting: AtomicBool,
}

impl InMemoryJobQueue {
    pub fn jobs(&self) -> Vec<NotificationJob> {
        self.jobs.lock().unwrap().clone()
    }

    /// Make every following insert fail, like an unavailable job table
    pub fn reject_inserts(&self) {
        self.rejecting.store(true, Ordering::SeqCst);
    }

    /// Insert a queued job, eligible immediately
    pub fn push(&self, job: &NewJob) -> Result<NotificationJob> {
        if self.rejecting.load(Ordering::SeqCst) {
            anyhow::bail!("job table unavailable");
        }

        let now = Utc::now();
        let job = NotificationJob {
            id: Uuid::new_v4(),
            name: job.name.clone(),
            notification_id: job.notification_id,
            payload: job.payload.clone(),
            attempts_made: 0,
            max_attempts: job.max_attempts,
            backoff_delay_ms: job.backoff_delay_ms,
            status: JobStatus::Queued,
            last_error: None,
            run_at: now,
            created_at: now,
            updated_at: now,
        };
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    /// Elapse every backoff and lease, making pending jobs eligible now
    pub fn fast_forward(&self) {
        let now = Utc::now();
        for job in self.jobs.lock().unwrap().iter_mut() {
            if matches!(job.status, JobStatus::Queued | JobStatus::Processing) {
                job.run_at = now;
            }
        }
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut NotificationJob)) {
        if let Some(job) = self.jobs.lock().unwrap().iter_mut().find(|j| j.id == id) {
            apply(job);
            job.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn claim_next(&self) -> Result<Option<NotificationJob>> {
        let now = Utc::now();
        let mut jobs = self.jobs.lock().unwrap();
        Ok(jobs
            .iter_mut()
            .filter(|j| {
                matches!(j.status, JobStatus::Queued | JobStatus::Processing) && j.run_at <= now
            })
            .min_by_key(|j| (j.run_at, j.created_at))
            .map(|job| {
                job.status = JobStatus::Processing;
                job.attempts_made += 1;
                job.run_at = now + Duration::seconds(CLAIM_LEASE_SECS);
                job.updated_at = now;
                job.clone()
            }))
    }

    async fn mark_done(&self, id: Uuid) -> Result<()> {
        self.update(id, |job| job.status = JobStatus::Done);
        Ok(())
    }

    async fn reschedule(&self, id: Uuid, run_at: DateTime<Utc>, error: &str) -> Result<()> {
        self.update(id, |job| {
            job.status = JobStatus::Queued;
            job.run_at = run_at;
            job.last_error = Some(error.to_string());
        });
        Ok(())
    }

    async fn mark_dead(&self, id: Uuid, error: &str) -> Result<()> {
        self.update(id, |job| {
            job.status = JobStatus::Dead;
            job.last_error = Some(error.to_string());
        });
        Ok(())
    }
}

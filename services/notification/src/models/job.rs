//! Notification job records
//!
//! A job moves `queued → processing → done`, or on failure back to `queued`
//! with an exponentially growing delay until its attempts run out, where it
//! stays as `dead` together with the last error.
//!
//! Claiming a job leases it: `run_at` is pushed [`CLAIM_LEASE_SECS`] ahead,
//! and a `processing` job whose lease ran out is claimed again.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Notification, NotificationType};

/// Name of the job that delivers a stored notification
pub const PROCESS_NOTIFICATION: &str = "process-notification";

/// Attempts before a job is declared dead
pub const MAX_ATTEMPTS: i32 = 3;

/// Base delay of the exponential backoff in milliseconds
pub const BACKOFF_DELAY_MS: i64 = 2000;

/// How long a claimed job stays with its worker before it can be claimed again
pub const CLAIM_LEASE_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Dead,
}

/// Payload carried by a `process-notification` job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub notification_id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub notification_type: NotificationType,
}

impl From<&Notification> for NotificationPayload {
    fn from(notification: &Notification) -> Self {
        Self {
            notification_id: notification.id,
            user_id: notification.user_id.clone(),
            title: notification.title.clone(),
            description: notification.description.clone(),
            notification_type: notification.notification_type,
        }
    }
}

/// Job to be enqueued
#[derive(Debug, Clone)]
pub struct NewJob {
    pub name: String,
    pub notification_id: Uuid,
    pub payload: serde_json::Value,
    pub max_attempts: i32,
    pub backoff_delay_ms: i64,
}

impl NewJob {
    /// Delivery job of a stored notification with the default retry policy
    pub fn deliver(notification: &Notification) -> serde_json::Result<Self> {
        Ok(Self {
            name: PROCESS_NOTIFICATION.to_string(),
            notification_id: notification.id,
            payload: serde_json::to_value(NotificationPayload::from(notification))?,
            max_attempts: MAX_ATTEMPTS,
            backoff_delay_ms: BACKOFF_DELAY_MS,
        })
    }
}

/// Persisted job
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NotificationJob {
    pub id: Uuid,
    pub name: String,
    pub notification_id: Uuid,
    pub payload: serde_json::Value,
    pub attempts_made: i32,
    pub max_attempts: i32,
    pub backoff_delay_ms: i64,
    pub status: JobStatus,
    pub last_error: Option<String>,
    pub run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What happens to a job after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Requeue, eligible again at the given time
    Retry(DateTime<Utc>),
    /// Attempts exhausted
    Dead,
}

/// Delay before the next attempt: `base × 2^(attempts_made − 1)`
pub fn backoff_delay(base_ms: i64, attempts_made: i32) -> Duration {
    let exponent = attempts_made.saturating_sub(1).clamp(0, 30) as u32;
    Duration::milliseconds(base_ms.saturating_mul(1_i64 << exponent))
}

impl NotificationJob {
    /// A lease expired on the last allowed attempt, so this claim is one too many
    pub fn is_exhausted(&self) -> bool {
        self.attempts_made > self.max_attempts
    }

    /// Decide the fate of the job after its current attempt failed
    ///
    /// `attempts_made` already counts the failed attempt.
    pub fn after_failure(&self, now: DateTime<Utc>) -> RetryDecision {
        if self.attempts_made >= self.max_attempts {
            RetryDecision::Dead
        } else {
            RetryDecision::Retry(now + backoff_delay(self.backoff_delay_ms, self.attempts_made))
        }
    }
}

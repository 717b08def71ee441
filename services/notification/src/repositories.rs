//! Notification repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    CreateNotificationRequest, Notification,
    job::{NewJob, NotificationJob},
};

pub mod jobs;
#[cfg(test)]
pub mod memory;

/// Persistence port for notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a new, unread notification and its delivery job atomically
    async fn create_queued(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<(Notification, NotificationJob)>;

    /// All notifications of a user, newest first
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Notification>>;

    /// Unread notifications of a user, newest first
    async fn find_unread_by_user(&self, user_id: &str) -> Result<Vec<Notification>>;

    async fn count_unread_by_user(&self, user_id: &str) -> Result<i64>;

    async fn update_read_status(&self, id: Uuid, is_read: bool) -> Result<Option<Notification>>;

    /// Delete and return the notification
    async fn delete(&self, id: Uuid) -> Result<Option<Notification>>;
}

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, description, notification_type, is_read, created_at, updated_at";

/// PostgreSQL-backed notification repository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create_queued(
        &self,
        request: &CreateNotificationRequest,
    ) -> Result<(Notification, NotificationJob)> {
        let mut tx = self.pool.begin().await?;

        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, description, notification_type)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(&request.user_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.notification_type)
        .fetch_one(&mut *tx)
        .await?;

        let job = jobs::insert_job(&mut *tx, &NewJob::deliver(&notification)?).await?;
        tx.commit().await?;

        info!(
            notification_id = %notification.id,
            job_id = %job.id,
            "Notification stored"
        );
        Ok((notification, job))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn find_unread_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1 AND is_read = FALSE
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn count_unread_by_user(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn update_read_status(&self, id: Uuid, is_read: bool) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET is_read = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_read)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "DELETE FROM notifications WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }
}

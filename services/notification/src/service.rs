//! Notification business logic

use std::sync::Arc;

use common::error::ApiError;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{CreateNotificationRequest, Notification},
    repositories::NotificationRepository,
};

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        let message = err.to_string();
        match err {
            NotificationError::NotFound => ApiError::NotFound(message),
            NotificationError::Internal(source) => ApiError::Internal(source),
        }
    }
}

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Persist the notification unread and queue its delivery
    pub async fn send_notification(
        &self,
        request: &CreateNotificationRequest,
    ) -> NotificationResult<Notification> {
        let (notification, job) = self.repository.create_queued(request).await?;

        info!(
            notification_id = %notification.id,
            job_id = %job.id,
            "Notification queued"
        );
        Ok(notification)
    }

    pub async fn get_notifications_by_user(
        &self,
        user_id: &str,
    ) -> NotificationResult<Vec<Notification>> {
        Ok(self.repository.find_by_user(user_id).await?)
    }

    pub async fn get_unread_notifications(
        &self,
        user_id: &str,
    ) -> NotificationResult<Vec<Notification>> {
        Ok(self.repository.find_unread_by_user(user_id).await?)
    }

    pub async fn get_unread_count(&self, user_id: &str) -> NotificationResult<i64> {
        Ok(self.repository.count_unread_by_user(user_id).await?)
    }

    pub async fn mark_as_read(&self, id: Uuid) -> NotificationResult<Notification> {
        self.set_read(id, true).await
    }

    pub async fn mark_as_unread(&self, id: Uuid) -> NotificationResult<Notification> {
        self.set_read(id, false).await
    }

    async fn set_read(&self, id: Uuid, is_read: bool) -> NotificationResult<Notification> {
        self.repository
            .update_read_status(id, is_read)
            .await?
            .ok_or(NotificationError::NotFound)
    }

    pub async fn delete_notification(&self, id: Uuid) -> NotificationResult<Notification> {
        let notification = self
            .repository
            .delete(id)
            .await?
            .ok_or(NotificationError::NotFound)?;

        info!(notification_id = %id, "Notification deleted");
        Ok(notification)
    }
}

//! Notification models for request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub mod job;

/// Delivery channel of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "notification_type", rename_all = "kebab-case")]
pub enum NotificationType {
    Email,
    Text,
    #[default]
    InApp,
}

/// Stored notification
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to send a notification
///
/// `user_id` is opaque: notifications may target ids minted by any service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub notification_type: NotificationType,
}

/// Body of the unread count endpoint
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

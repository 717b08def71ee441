//! Delivery channels
//!
//! No real transport is wired in; each channel simulates its latency.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;

use crate::models::{NotificationType, job::NotificationPayload};

/// Delivers one notification over its channel
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<()>;
}

/// Simulated latency per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchDelays {
    pub email: Duration,
    pub text: Duration,
    pub in_app: Duration,
}

impl Default for DispatchDelays {
    fn default() -> Self {
        Self {
            email: Duration::from_millis(1000),
            text: Duration::from_millis(500),
            in_app: Duration::from_millis(100),
        }
    }
}

impl DispatchDelays {
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            email: Duration::ZERO,
            text: Duration::ZERO,
            in_app: Duration::ZERO,
        }
    }

    pub fn for_type(&self, notification_type: NotificationType) -> Duration {
        match notification_type {
            NotificationType::Email => self.email,
            NotificationType::Text => self.text,
            NotificationType::InApp => self.in_app,
        }
    }
}

/// Sender that logs and waits instead of talking to a provider
#[derive(Debug, Clone, Default)]
pub struct SimulatedSender {
    delays: DispatchDelays,
}

impl SimulatedSender {
    pub fn new(delays: DispatchDelays) -> Self {
        Self { delays }
    }
}

#[async_trait]
impl NotificationSender for SimulatedSender {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        let channel = match payload.notification_type {
            NotificationType::Email => "email",
            NotificationType::Text => "text",
            NotificationType::InApp => "in-app",
        };

        info!(
            notification_id = %payload.notification_id,
            user_id = %payload.user_id,
            channel,
            "Sending {} notification: {}",
            channel,
            payload.title
        );

        sleep(self.delays.for_type(payload.notification_type)).await;
        Ok(())
    }
}

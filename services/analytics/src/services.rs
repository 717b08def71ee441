//! Report assembly
//!
//! The stores do the aggregation; reports only slice and count.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use crate::{
    models::{OrderReport, OrderSummary, UserReport, UserSummary},
    repositories::RelationalAnalytics,
};

pub mod document;

/// Recent orders included in the order report
pub const RECENT_ORDERS_RETURNED: usize = 20;

#[derive(Clone)]
pub struct RelationalService {
    repository: Arc<dyn RelationalAnalytics>,
}

impl RelationalService {
    pub fn new(repository: Arc<dyn RelationalAnalytics>) -> Self {
        Self { repository }
    }

    pub async fn user_report(&self) -> Result<UserReport> {
        let users = self
            .repository
            .users_with_orders()
            .await
            .context("Error fetching user data")?;

        let summary = UserSummary {
            total_users: users.len(),
            users_with_orders: users.iter().filter(|u| !u.orders.is_empty()).count(),
        };
        debug!(total_users = summary.total_users, "User report generated");

        Ok(UserReport { users, summary })
    }

    pub async fn order_report(&self) -> Result<OrderReport> {
        let analytics = self
            .repository
            .order_analytics()
            .await
            .context("Error fetching order analytics")?;
        let mut recent_orders = self
            .repository
            .recent_orders()
            .await
            .context("Error fetching order analytics")?;

        let total_orders_processed = recent_orders.len();
        recent_orders.truncate(RECENT_ORDERS_RETURNED);

        Ok(OrderReport {
            analytics,
            recent_orders,
            summary: OrderSummary {
                total_orders_processed,
                analytics_generated: Utc::now(),
            },
        })
    }
}

use anyhow::Result;
use async_trait::async_trait;

use super::{RelationalAnalytics, document::DocumentAnalytics};
use crate::models::{
    OrderAnalytics, RecentOrder, UserWithOrders,
    document::{CategoryStats, CategoryUsers, CustomerStats, MonthlyTrend, UserOverview},
};

/// Canned relational rows; `None` simulates an unreachable store
#[derive(Default)]
pub struct StaticRelational {
    pub users: Vec<UserWithOrders>,
    pub recent_orders: Vec<RecentOrder>,
    pub analytics: Option<OrderAnalytics>,
}

#[async_trait]
impl RelationalAnalytics for StaticRelational {
    async fn users_with_orders(&self) -> Result<Vec<UserWithOrders>> {
        Ok(self.users.clone())
    }

    async fn recent_orders(&self) -> Result<Vec<RecentOrder>> {
        Ok(self.recent_orders.clone())
    }

    async fn order_analytics(&self) -> Result<OrderAnalytics> {
        self.analytics
            .clone()
            .ok_or_else(|| anyhow::anyhow!("relational store unavailable"))
    }
}

#[derive(Default)]
pub struct StaticDocument {
    pub users: Vec<UserOverview>,
    pub users_by_category: Vec<CategoryUsers>,
    pub category_stats: Vec<CategoryStats>,
    pub trends: Vec<MonthlyTrend>,
    pub customers: Vec<CustomerStats>,
}

#[async_trait]
impl DocumentAnalytics for StaticDocument {
    async fn recent_users(&self) -> Result<Vec<UserOverview>> {
        Ok(self.users.clone())
    }

    async fn users_by_category(&self) -> Result<Vec<CategoryUsers>> {
        Ok(self.users_by_category.clone())
    }

    async fn product_category_stats(&self) -> Result<Vec<CategoryStats>> {
        Ok(self.category_stats.clone())
    }

    async fn order_trends(&self) -> Result<Vec<MonthlyTrend>> {
        Ok(self.trends.clone())
    }

    async fn customer_stats(&self) -> Result<Vec<CustomerStats>> {
        Ok(self.customers.clone())
    }
}

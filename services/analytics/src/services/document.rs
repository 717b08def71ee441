use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::{
    models::document::{
        ProductReport, ProductSummary, UserCategoryReport, UserCategorySummary,
    },
    repositories::document::DocumentAnalytics,
};

/// Users included in the user-category report
pub const USERS_RETURNED: usize = 20;

/// Customers included in the product report
pub const TOP_CUSTOMERS_RETURNED: usize = 10;

#[derive(Clone)]
pub struct DocumentService {
    repository: Arc<dyn DocumentAnalytics>,
}

impl DocumentService {
    pub fn new(repository: Arc<dyn DocumentAnalytics>) -> Self {
        Self { repository }
    }

    pub async fn user_category_report(&self) -> Result<UserCategoryReport> {
        let mut users = self
            .repository
            .recent_users()
            .await
            .context("Error fetching user category analytics")?;
        let users_by_category = self
            .repository
            .users_by_category()
            .await
            .context("Error fetching user category analytics")?;

        let summary = UserCategorySummary {
            total_users: users.len(),
            categories_analyzed: users_by_category.len(),
            generated_at: Utc::now(),
        };
        users.truncate(USERS_RETURNED);

        Ok(UserCategoryReport {
            users,
            users_by_category,
            summary,
        })
    }

    pub async fn product_report(&self) -> Result<ProductReport> {
        let product_category_analytics = self
            .repository
            .product_category_stats()
            .await
            .context("Error fetching product analytics")?;
        let order_trends = self
            .repository
            .order_trends()
            .await
            .context("Error fetching product analytics")?;
        let mut top_customers = self
            .repository
            .customer_stats()
            .await
            .context("Error fetching product analytics")?;

        top_customers.truncate(TOP_CUSTOMERS_RETURNED);

        let summary = ProductSummary {
            categories_analyzed: product_category_analytics.len(),
            trend_periods_analyzed: order_trends.len(),
            top_customers_count: top_customers.len(),
            generated_at: Utc::now(),
        };

        Ok(ProductReport {
            product_category_analytics,
            order_trends,
            top_customers,
            summary,
        })
    }
}

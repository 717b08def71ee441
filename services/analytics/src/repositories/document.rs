//! Aggregations over the document store

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::document::{
    CategoryStats, CategoryUsers, CustomerStats, MonthlyTrend, UserOverview,
};

pub const USERS_FETCHED: i64 = 100;
pub const CATEGORY_GROUPS: i64 = 50;
pub const PRODUCT_CATEGORIES: i64 = 20;
pub const TREND_MONTHS: i64 = 12;
pub const CUSTOMERS_FETCHED: i64 = 50;

#[async_trait]
pub trait DocumentAnalytics: Send + Sync {
    /// Most recent users
    async fn recent_users(&self) -> Result<Vec<UserOverview>>;

    /// Buyers grouped by the category of what they purchased
    async fn users_by_category(&self) -> Result<Vec<CategoryUsers>>;

    /// Price statistics per category, largest categories first
    async fn product_category_stats(&self) -> Result<Vec<CategoryStats>>;

    /// Monthly order counts by status, most recent month first
    async fn order_trends(&self) -> Result<Vec<MonthlyTrend>>;

    /// Customers with at least one order, biggest spenders first
    async fn customer_stats(&self) -> Result<Vec<CustomerStats>>;
}

pub struct PgDocumentAnalytics {
    pool: PgPool,
}

impl PgDocumentAnalytics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentAnalytics for PgDocumentAnalytics {
    async fn recent_users(&self) -> Result<Vec<UserOverview>> {
        let users = sqlx::query_as::<_, UserOverview>(
            r#"
            SELECT id, first_name, last_name, email, role, created_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(USERS_FETCHED)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn users_by_category(&self) -> Result<Vec<CategoryUsers>> {
        let groups = sqlx::query_as::<_, CategoryUsers>(
            r#"
            SELECT c.name AS category,
                   COUNT(DISTINCT u.id) AS user_count,
                   jsonb_agg(DISTINCT jsonb_build_object(
                       'firstName', u.first_name,
                       'lastName', u.last_name,
                       'email', u.email
                   )) AS users
            FROM users u
            JOIN orders o ON o.user_id = u.id
            JOIN order_items oi ON oi.order_id = o.id
            JOIN products p ON p.id = oi.product_id
            JOIN categories c ON c.id = p.category_id
            GROUP BY c.name
            ORDER BY user_count DESC, c.name
            LIMIT $1
            "#,
        )
        .bind(CATEGORY_GROUPS)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn product_category_stats(&self) -> Result<Vec<CategoryStats>> {
        let stats = sqlx::query_as::<_, CategoryStats>(
            r#"
            SELECT c.name AS category,
                   COUNT(p.id) AS product_count,
                   ROUND(AVG(p.price), 2) AS average_price,
                   MIN(p.price) AS min_price,
                   MAX(p.price) AS max_price,
                   jsonb_agg(jsonb_build_object(
                       'title', p.title,
                       'price', p.price::text,
                       'createdAt', p.created_at
                   ) ORDER BY p.created_at) AS products
            FROM products p
            JOIN categories c ON c.id = p.category_id
            GROUP BY c.name
            ORDER BY product_count DESC, c.name
            LIMIT $1
            "#,
        )
        .bind(PRODUCT_CATEGORIES)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    async fn order_trends(&self) -> Result<Vec<MonthlyTrend>> {
        let trends = sqlx::query_as::<_, MonthlyTrend>(
            r#"
            WITH monthly AS (
                SELECT EXTRACT(YEAR FROM created_at)::INT AS year,
                       EXTRACT(MONTH FROM created_at)::INT AS month,
                       status,
                       COUNT(*) AS count
                FROM orders
                GROUP BY 1, 2, 3
            )
            SELECT year, month,
                   jsonb_agg(jsonb_build_object('status', status, 'count', count)
                             ORDER BY status) AS orders,
                   SUM(count)::BIGINT AS total_orders
            FROM monthly
            GROUP BY year, month
            ORDER BY year DESC, month DESC
            LIMIT $1
            "#,
        )
        .bind(TREND_MONTHS)
        .fetch_all(&self.pool)
        .await?;

        Ok(trends)
    }

    async fn customer_stats(&self) -> Result<Vec<CustomerStats>> {
        let customers = sqlx::query_as::<_, CustomerStats>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.email, u.role,
                   COUNT(DISTINCT o.id) AS total_orders,
                   COALESCE(SUM(oi.quantity), 0)::BIGINT AS total_items,
                   COALESCE(SUM(oi.price * oi.quantity), 0) AS total_spent
            FROM users u
            JOIN orders o ON o.user_id = u.id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY u.id
            ORDER BY total_spent DESC
            LIMIT $1
            "#,
        )
        .bind(CUSTOMERS_FETCHED)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}

//! Read-only queries over the relational store

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{OrderAnalytics, RecentOrder, StatusCount, UserWithOrders};

pub mod document;
#[cfg(test)]
pub mod memory;

/// Users fetched for the user report
pub const USERS_FETCHED: i64 = 100;

/// Orders fetched for the order report
pub const RECENT_ORDERS_FETCHED: i64 = 100;

#[async_trait]
pub trait RelationalAnalytics: Send + Sync {
    /// Newest users, each with their orders
    async fn users_with_orders(&self) -> Result<Vec<UserWithOrders>>;

    /// Newest orders with customer and product detail
    async fn recent_orders(&self) -> Result<Vec<RecentOrder>>;

    async fn order_analytics(&self) -> Result<OrderAnalytics>;
}

pub struct PgRelationalAnalytics {
    pool: PgPool,
}

impl PgRelationalAnalytics {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationalAnalytics for PgRelationalAnalytics {
    async fn users_with_orders(&self) -> Result<Vec<UserWithOrders>> {
        let users = sqlx::query_as::<_, UserWithOrders>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.email, u.role, u.created_at,
                   COALESCE(
                       (SELECT jsonb_agg(
                                   jsonb_build_object(
                                       'id', o.id,
                                       'status', o.status,
                                       'createdAt', o.created_at
                                   ) ORDER BY o.created_at DESC)
                        FROM orders o WHERE o.user_id = u.id),
                       '[]'::jsonb
                   ) AS orders
            FROM users u
            ORDER BY u.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(USERS_FETCHED)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn recent_orders(&self) -> Result<Vec<RecentOrder>> {
        let orders = sqlx::query_as::<_, RecentOrder>(
            r#"
            SELECT o.id, o.status, o.created_at,
                   jsonb_build_object(
                       'firstName', u.first_name,
                       'lastName', u.last_name,
                       'email', u.email
                   ) AS user,
                   COALESCE(
                       (SELECT jsonb_agg(
                                   jsonb_build_object(
                                       'quantity', oi.quantity,
                                       'price', oi.price::text,
                                       'product', jsonb_build_object(
                                           'title', p.title,
                                           'price', p.price::text
                                       )
                                   ) ORDER BY oi.created_at)
                        FROM order_items oi
                        JOIN products p ON p.id = oi.product_id
                        WHERE oi.order_id = o.id),
                       '[]'::jsonb
                   ) AS order_items
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_ORDERS_FETCHED)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn order_analytics(&self) -> Result<OrderAnalytics> {
        let total_orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let total_revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(price * quantity), 0) FROM order_items",
        )
        .fetch_one(&self.pool)
        .await?;

        let orders_by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderAnalytics {
            total_orders,
            total_revenue,
            orders_by_status,
        })
    }
}

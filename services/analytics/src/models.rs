//! Report rows of the relational store
//!
//! Nested collections are aggregated to JSON in SQL and decoded with
//! `#[sqlx(json)]`.

use chrono::{DateTime, Utc};
use common::auth::Role;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub mod document;

/// Order status as recorded in the analytics stores
///
/// Narrower than the order service's status: there is no `processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "analytics_order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// Order reference embedded in a user row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrder {
    pub id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWithOrders {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[sqlx(json)]
    pub orders: Vec<UserOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Store-wide order figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAnalytics {
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub orders_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub title: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentOrderItem {
    pub quantity: i32,
    pub price: Decimal,
    pub product: ProductRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[sqlx(json)]
    pub user: Customer,
    #[sqlx(json)]
    pub order_items: Vec<RecentOrderItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub total_users: usize,
    pub users_with_orders: usize,
}

/// Body of `GET /api/postgres/users`
#[derive(Debug, Serialize)]
pub struct UserReport {
    pub users: Vec<UserWithOrders>,
    pub summary: UserSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders_processed: usize,
    pub analytics_generated: DateTime<Utc>,
}

/// Body of `GET /api/postgres/orders`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub analytics: OrderAnalytics,
    pub recent_orders: Vec<RecentOrder>,
    pub summary: OrderSummary,
}

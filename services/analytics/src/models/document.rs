//! Report rows of the document store

use chrono::{DateTime, Utc};
use common::auth::Role;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Customer, OrderStatus};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Buyers of one category
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsers {
    pub category: String,
    pub user_count: i64,
    #[sqlx(json)]
    pub users: Vec<Customer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProduct {
    pub title: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Price statistics of one category
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub product_count: i64,
    pub average_price: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    #[sqlx(json)]
    pub products: Vec<CategoryProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

/// Orders of one calendar month, split by status
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: i32,
    #[sqlx(json)]
    pub orders: Vec<TrendStatusCount>,
    pub total_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub total_orders: i64,
    pub total_items: i64,
    pub total_spent: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCategorySummary {
    pub total_users: usize,
    pub categories_analyzed: usize,
    pub generated_at: DateTime<Utc>,
}

/// Body of `GET /api/mongo/user-categories`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCategoryReport {
    pub users: Vec<UserOverview>,
    pub users_by_category: Vec<CategoryUsers>,
    pub summary: UserCategorySummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub categories_analyzed: usize,
    pub trend_periods_analyzed: usize,
    pub top_customers_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Body of `GET /api/mongo/product-analytics`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub product_category_analytics: Vec<CategoryStats>,
    pub order_trends: Vec<MonthlyTrend>,
    pub top_customers: Vec<CustomerStats>,
    pub summary: ProductSummary,
}

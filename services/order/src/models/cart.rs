//! Cart models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per (user, product) pair
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i32,
    pub user_id: Uuid,
    pub product_id: i32,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to add a product to the caller's cart
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub price: Decimal,
    pub quantity: i32,
}

/// Request to set the quantity of a cart row
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartRequest {
    pub quantity: i32,
}

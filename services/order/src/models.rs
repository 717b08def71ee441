//! Order and cart models for request and response payloads

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub mod cart;

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err("Invalid order status".to_string()),
        }
    }
}

/// Status of a single order line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "order_item_status", rename_all = "snake_case")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Confirmed,
    OutOfStock,
    Cancelled,
}

/// Order row without its items
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: i32,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order line
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub price: Decimal,
    pub quantity: i32,
    pub status: OrderItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order with its items and derived total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItem>,
    /// Σ price × quantity, never stored
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(record: OrderRecord, order_items: Vec<OrderItem>) -> Self {
        let total = order_items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        Self {
            id: record.id,
            user_id: record.user_id,
            status: record.status,
            order_items,
            total,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Line of an order being placed
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub product_id: i32,
    pub price: Decimal,
    pub quantity: i32,
}

/// Request for order creation; the user is the authenticated caller
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<NewOrderItem>,
}

/// Request for an order status change
///
/// Kept as a string so unknown values get the service's own message.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

//! Order repository for database operations

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewOrderItem, Order, OrderItem, OrderRecord, OrderStatus};

pub mod cart;
#[cfg(test)]
pub mod memory;

/// Persistence port for orders and their items
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a pending order and all its items atomically
    async fn create_with_items(&self, user_id: Uuid, items: &[NewOrderItem]) -> Result<Order>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>>;

    /// Orders of a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>>;

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>>;
}

const ORDER_COLUMNS: &str = "id, user_id, status, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, order_id, product_id, price, quantity, status, created_at, updated_at";

/// PostgreSQL-backed order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn items_of(&self, order_ids: &[i32]) -> Result<HashMap<i32, Vec<OrderItem>>> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }
        Ok(by_order)
    }

    async fn with_items(&self, record: OrderRecord) -> Result<Order> {
        let mut items = self.items_of(&[record.id]).await?;
        let order_items = items.remove(&record.id).unwrap_or_default();
        Ok(Order::new(record, order_items))
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_with_items(&self, user_id: Uuid, items: &[NewOrderItem]) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "INSERT INTO orders (user_id, status) VALUES ($1, $2) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO order_items (order_id, product_id, price, quantity) ");
        builder.push_values(items, |mut row, item| {
            row.push_bind(record.id)
                .push_bind(item.product_id)
                .push_bind(item.price)
                .push_bind(item.quantity);
        });
        builder.push(format!(" RETURNING {ITEM_COLUMNS}"));

        let order_items = builder
            .build_query_as::<OrderItem>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            order_id = record.id,
            items = order_items.len(),
            "Order created"
        );
        Ok(Order::new(record, order_items))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Ok(Some(self.with_items(record).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i32> = records.iter().map(|r| r.id).collect();
        let mut items = self.items_of(&ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let order_items = items.remove(&record.id).unwrap_or_default();
                Order::new(record, order_items)
            })
            .collect())
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>> {
        info!(order_id = id, %status, "Updating order status");

        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            r#"
            UPDATE orders SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Ok(Some(self.with_items(record).await?)),
            None => Ok(None),
        }
    }
}

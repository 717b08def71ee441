//! Cart repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::cart::CartItem;

/// Persistence port for cart rows
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Insert a row, or merge into the existing (user, product) row
    ///
    /// Quantities add up and the latest price wins. Returns `None` when the
    /// merged quantity would not fit in an `INTEGER`.
    async fn merge_item(
        &self,
        user_id: Uuid,
        product_id: i32,
        price: Decimal,
        quantity: i32,
    ) -> Result<Option<CartItem>>;

    /// Rows of a user, oldest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<CartItem>>;

    /// Set the quantity of a row owned by `user_id`
    async fn update_quantity(
        &self,
        user_id: Uuid,
        id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>>;

    async fn remove_by_user_and_product(&self, user_id: Uuid, product_id: i32) -> Result<bool>;

    /// Returns the number of removed rows
    async fn clear(&self, user_id: Uuid) -> Result<u64>;
}

const CART_COLUMNS: &str = "id, user_id, product_id, price, quantity, created_at, updated_at";

/// PostgreSQL-backed cart repository
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn merge_item(
        &self,
        user_id: Uuid,
        product_id: i32,
        price: Decimal,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        // The WHERE guard turns an INTEGER overflow into "no row" instead of
        // a 22003 error.
        let item = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            INSERT INTO cart (user_id, product_id, price, quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, product_id) DO UPDATE
            SET quantity = cart.quantity + EXCLUDED.quantity,
                price = EXCLUDED.price,
                updated_at = NOW()
            WHERE cart.quantity <= 2147483647 - EXCLUDED.quantity
            RETURNING {CART_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(price)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let items = sqlx::query_as::<_, CartItem>(&format!(
            "SELECT {CART_COLUMNS} FROM cart WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn update_quantity(
        &self,
        user_id: Uuid,
        id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            r#"
            UPDATE cart SET quantity = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {CART_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn remove_by_user_and_product(&self, user_id: Uuid, product_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cart WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM cart WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

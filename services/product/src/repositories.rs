//! Repositories for catalog database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{Category, CreateProductRequest, Product, UpdateProductRequest};

pub mod category;
#[cfg(test)]
pub mod memory;

/// Persistence port for products
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, request: &CreateProductRequest) -> Result<Product>;

    async fn find_all(&self) -> Result<Vec<Product>>;

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>>;

    /// Apply a partial update; `None` when the product does not exist
    async fn update(&self, id: i32, request: &UpdateProductRequest) -> Result<Option<Product>>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: i32) -> Result<bool>;
}

/// Product columns joined with their category, `c_` prefixed
const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.category_id, p.title, p.description, p.summary, p.amount, p.currency,
           p.images, p.tags, p.created_at, p.updated_at,
           c.id AS c_id, c.name AS c_name, c.description AS c_description,
           c.parent_category_id AS c_parent_category_id, c.tags AS c_tags,
           c.created_at AS c_created_at, c.updated_at AS c_updated_at
"#;

fn map_product(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        category_id: row.try_get("category_id")?,
        category: Category {
            id: row.try_get("c_id")?,
            name: row.try_get("c_name")?,
            description: row.try_get("c_description")?,
            parent_category_id: row.try_get("c_parent_category_id")?,
            tags: row.try_get("c_tags")?,
            created_at: row.try_get("c_created_at")?,
            updated_at: row.try_get("c_updated_at")?,
        },
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        summary: row.try_get("summary")?,
        amount: row.try_get("amount")?,
        currency: row.try_get("currency")?,
        images: row.try_get("images")?,
        tags: row.try_get("tags")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, request: &CreateProductRequest) -> Result<Product> {
        info!("Creating product: {}", request.title);

        let row = sqlx::query(&format!(
            r#"
            WITH p AS (
                INSERT INTO products (category_id, title, description, summary, amount,
                                      currency, images, tags)
                VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'USD'), $7, $8)
                RETURNING *
            )
            {PRODUCT_SELECT}
            FROM p JOIN categories c ON c.id = p.category_id
            "#
        ))
        .bind(request.category_id)
        .bind(&request.title)
        .bind(request.description.as_deref())
        .bind(request.summary.as_deref())
        .bind(request.amount)
        .bind(request.currency.as_deref())
        .bind(&request.images)
        .bind(&request.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_product(&row)?)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "{PRODUCT_SELECT} FROM products p JOIN categories c ON c.id = p.category_id ORDER BY p.id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_product).collect::<Result<_, _>>()?)
    }

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            r#"
            {PRODUCT_SELECT}
            FROM products p JOIN categories c ON c.id = p.category_id
            WHERE p.category_id = $1
            ORDER BY p.id
            "#
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_product).collect::<Result<_, _>>()?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>> {
        let row = sqlx::query(&format!(
            r#"
            {PRODUCT_SELECT}
            FROM products p JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_product).transpose()?)
    }

    async fn update(&self, id: i32, request: &UpdateProductRequest) -> Result<Option<Product>> {
        info!("Updating product: {}", id);

        let row = sqlx::query(&format!(
            r#"
            WITH p AS (
                UPDATE products SET
                    category_id = COALESCE($2, category_id),
                    title = COALESCE($3, title),
                    description = COALESCE($4, description),
                    summary = COALESCE($5, summary),
                    amount = COALESCE($6, amount),
                    currency = COALESCE($7, currency),
                    images = COALESCE($8, images),
                    tags = COALESCE($9, tags),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {PRODUCT_SELECT}
            FROM p JOIN categories c ON c.id = p.category_id
            "#
        ))
        .bind(id)
        .bind(request.category_id)
        .bind(request.title.as_deref())
        .bind(request.description.as_deref())
        .bind(request.summary.as_deref())
        .bind(request.amount)
        .bind(request.currency.as_deref())
        .bind(request.images.as_ref())
        .bind(request.tags.as_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_product).transpose()?)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

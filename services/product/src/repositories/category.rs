//! Category repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};

/// Persistence port for categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, request: &CreateCategoryRequest) -> Result<Category>;

    async fn find_all(&self) -> Result<Vec<Category>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>>;

    async fn update(&self, id: i32, request: &UpdateCategoryRequest)
    -> Result<Option<Category>>;

    async fn delete(&self, id: i32) -> Result<bool>;

    /// Whether any product still references the category
    async fn has_products(&self, id: i32) -> Result<bool>;
}

const CATEGORY_COLUMNS: &str =
    "id, name, description, parent_category_id, tags, created_at, updated_at";

/// PostgreSQL-backed category repository
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new category repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, request: &CreateCategoryRequest) -> Result<Category> {
        info!("Creating category: {}", request.name);

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, description, parent_category_id, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&request.name)
        .bind(request.description.as_deref())
        .bind(request.parent_category_id)
        .bind(&request.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn update(
        &self,
        id: i32,
        request: &UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                parent_category_id = COALESCE($4, parent_category_id),
                tags = COALESCE($5, tags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .bind(request.parent_category_id)
        .bind(request.tags.as_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn has_products(&self, id: i32) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE category_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

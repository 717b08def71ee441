//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, UpdateProfile, User};

#[cfg(test)]
pub mod memory;

/// Persistence port for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, or `None` when the email is already taken
    async fn create(&self, new_user: &NewUser) -> Result<Option<User>>;

    /// Find a user by (normalized) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Apply a partial profile update
    async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> Result<Option<User>>;

    /// Replace the password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<Option<User>>;
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, address, mobile, date_of_birth, \
     password_hash, addresses, role, created_at, updated_at";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<Option<User>> {
        info!("Creating new user: {}", new_user.email);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, address, mobile, date_of_birth,
                               password_hash, addresses, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(Json(&new_user.address))
        .bind(Json(&new_user.mobile))
        .bind(new_user.date_of_birth)
        .bind(&new_user.password_hash)
        .bind(Json(&new_user.addresses))
        .bind(new_user.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> Result<Option<User>> {
        info!("Updating profile of user: {}", id);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                address = COALESCE($4, address),
                mobile = COALESCE($5, mobile),
                date_of_birth = COALESCE($6, date_of_birth),
                addresses = COALESCE($7, addresses),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(update.address.as_ref().map(Json))
        .bind(update.mobile.as_ref().map(Json))
        .bind(update.date_of_birth)
        .bind(update.addresses.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

use std::sync::Arc;

use anyhow::Result;
use common::{
    auth::{JwtConfig, JwtService},
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
    server,
    settings::ServerConfig,
    telemetry,
};
use sqlx::migrate::Migrator;
use tracing::info;

mod models;
mod password;
mod repositories;
mod reset_codes;
mod routes;
mod service;
mod validation;

use crate::{
    repositories::PgUserRepository, reset_codes::ResetCodeStore, service::UserService,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub jwt_service: JwtService,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("Starting user service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?);

    // Reset codes are shared through Redis
    let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;

    let user_service = UserService::new(
        Arc::new(PgUserRepository::new(pool)),
        ResetCodeStore::new(Arc::new(redis_pool)),
        jwt_service.clone(),
    );

    let app = routes::create_router(AppState {
        user_service,
        jwt_service,
    });

    let server_config = ServerConfig::from_env(3001)?;
    server::serve(app, &server_config, "User service").await
}

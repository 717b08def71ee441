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
mod repositories;
mod routes;
mod services;
mod state;
mod validation;

use crate::{
    repositories::{PgProductRepository, category::PgCategoryRepository},
    services::{ProductService, category::CategoryService},
    state::AppState,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("Starting product service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Product listings are cached in Redis
    let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;
    if !redis_pool.health_check().await.unwrap_or(false) {
        tracing::warn!("Redis is not reachable; product listings will be served uncached");
    }

    let categories = Arc::new(PgCategoryRepository::new(pool.clone()));
    let products = Arc::new(PgProductRepository::new(pool));

    let cache = Arc::new(redis_pool);

    let app_state = AppState {
        product_service: ProductService::new(products, categories.clone(), cache.clone()),
        category_service: CategoryService::new(categories, cache),
        jwt_service: JwtService::new(JwtConfig::from_env()?),
    };

    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env(3002)?;
    server::serve(app, &server_config, "Product service").await
}

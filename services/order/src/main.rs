use std::sync::Arc;

use anyhow::Result;
use common::{
    auth::{JwtConfig, JwtService},
    database::{self, DatabaseConfig},
    server,
    settings::ServerConfig,
    telemetry,
};
use order::{
    MIGRATOR,
    repositories::{PgOrderRepository, cart::PgCartRepository},
    routes,
    services::{OrderService, cart::CartService},
    state::AppState,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("Starting order service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    let app_state = AppState {
        order_service: OrderService::new(Arc::new(PgOrderRepository::new(pool.clone()))),
        cart_service: CartService::new(Arc::new(PgCartRepository::new(pool))),
        jwt_service: JwtService::new(JwtConfig::from_env()?),
    };

    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env(3003)?;
    server::serve(app, &server_config, "Order service").await
}

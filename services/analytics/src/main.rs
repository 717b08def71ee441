use std::sync::Arc;

use anyhow::Result;
use common::{
    database::{self, DatabaseConfig},
    server,
    settings::ServerConfig,
    telemetry,
};
use sqlx::{PgPool, migrate::Migrator};
use tracing::info;

mod models;
mod repositories;
mod routes;
mod services;
mod state;

use crate::{
    repositories::{PgRelationalAnalytics, document::PgDocumentAnalytics},
    services::{RelationalService, document::DocumentService},
    state::AppState,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn connect(config: &DatabaseConfig, store: &str) -> Result<PgPool> {
    let pool = database::init_pool(config).await?;

    if database::health_check(&pool).await? {
        info!("{} store connection successful", store);
    } else {
        anyhow::bail!("Failed to connect to the {} store", store);
    }

    database::run_migrations(&pool, &MIGRATOR).await?;
    Ok(pool)
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("Starting analytics service");

    let relational = connect(&DatabaseConfig::from_env()?, "relational").await?;
    let document = connect(
        &DatabaseConfig::from_env_prefixed("DOCUMENT_DATABASE")?,
        "document",
    )
    .await?;

    let app_state = AppState {
        relational_service: RelationalService::new(Arc::new(PgRelationalAnalytics::new(
            relational,
        ))),
        document_service: DocumentService::new(Arc::new(PgDocumentAnalytics::new(document))),
    };

    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env(3005)?;
    server::serve(app, &server_config, "Analytics service").await
}

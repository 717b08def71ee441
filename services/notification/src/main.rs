use std::sync::Arc;

use anyhow::Result;
use common::{
    auth::{JwtConfig, JwtService},
    database::{self, DatabaseConfig},
    server,
    settings::ServerConfig,
    telemetry,
};
use notification::{
    MIGRATOR,
    dispatcher::{DispatchDelays, SimulatedSender},
    repositories::{PgNotificationRepository, jobs::PgJobQueue},
    routes,
    service::NotificationService,
    state::AppState,
    worker::{NotificationWorker, WorkerConfig},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    info!("Starting notification service");

    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Keep the scheduler alive for the lifetime of the server
    let worker_config = WorkerConfig::from_env()?;
    let scheduler = if worker_config.worker_enabled {
        let worker = NotificationWorker::new(
            Arc::new(PgJobQueue::new(pool.clone())),
            Arc::new(SimulatedSender::new(DispatchDelays::default())),
        );
        Some(worker.start(&worker_config.poll_schedule).await?)
    } else {
        info!("Notification worker disabled");
        None
    };

    let repository = Arc::new(PgNotificationRepository::new(pool));
    let app_state = AppState {
        notification_service: NotificationService::new(repository),
        jwt_service: JwtService::new(JwtConfig::from_env()?),
    };

    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env(3004)?;
    server::serve(app, &server_config, "Notification service").await?;

    // Jobs interrupted here are claimed again once their lease expires
    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
        info!("Notification worker stopped");
    }
    Ok(())
}

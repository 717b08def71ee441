//! Common library for the storefront services
//!
//! This crate provides shared functionality used across the user, product,
//! order, notification and analytics services: database and Redis
//! connectivity, JWT authentication, the JSON response envelope, error
//! handling and configuration.
//!
//! A service binary boots the same way everywhere:
//!
//! ```rust,no_run
//! use common::{database::{self, DatabaseConfig}, settings::ServerConfig, telemetry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     telemetry::init();
//!
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = database::init_pool(&config).await?;
//!     println!("Database health check: {}", database::health_check(&pool).await?);
//!
//!     let app = axum::Router::new();
//!     common::server::serve(app, &ServerConfig::from_env(3000)?, "Example service").await
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod database;
pub mod error;
pub mod extract;
pub mod response;
pub mod server;
pub mod settings;
pub mod telemetry;

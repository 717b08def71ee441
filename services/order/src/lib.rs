//! Order service library
//!
//! Orders with their items, and the per-user cart.

use sqlx::migrate::Migrator;

pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

/// Schema of the order service
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

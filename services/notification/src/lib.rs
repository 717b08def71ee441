//! Notification service library
//!
//! Stores in-app notifications and delivers them through a durable job
//! queue drained by a background worker.

use sqlx::migrate::Migrator;

pub mod dispatcher;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod state;
pub mod validation;
pub mod worker;

/// Schema of the notification service
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

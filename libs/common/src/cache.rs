//! Redis cache module for the storefront services
//!
//! This module provides functionality for connecting to Redis and performing
//! basic cache operations like get and set with TTL support. Services depend
//! on the [`Cache`] trait so the product cache and the password reset code
//! store can run against an in-memory implementation in tests.

use anyhow::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tracing::info;

/// Key-value store with optional expiry
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value, expiring after `ttl_seconds` when given
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()>;

    /// Delete a key; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Result<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Ok(RedisConfig { url })
    }
}

/// Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
}

impl RedisPool {
    /// Initialize a new Redis connection pool
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.clone())?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool { client })
    }

    /// Get a connection from the pool
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        let conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn)
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl Cache for RedisPool {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
        let mut conn = self.get_connection().await?;

        if let Some(ttl) = ttl_seconds {
            let _: () = conn.set_ex(key, value, ttl).await?;
        } else {
            let _: () = conn.set(key, value).await?;
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(key).await?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryCache;

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// In-process [`Cache`] honouring TTLs, for tests
    #[derive(Default)]
    pub struct MemoryCache {
        entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
    }

    impl MemoryCache {
        pub fn new() -> Self {
            Self::default()
        }

        /// Whether a live entry exists for `key`
        pub fn contains(&self, key: &str) -> bool {
            let entries = self.entries.lock().unwrap();
            entries
                .get(key)
                .is_some_and(|(_, expiry)| expiry.is_none_or(|at| Instant::now() < at))
        }
    }

    #[async_trait]
    impl Cache for MemoryCache {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(key) {
                Some((_, Some(at))) if Instant::now() >= *at => {
                    entries.remove(key);
                    Ok(None)
                }
                Some((value, _)) => Ok(Some(value.clone())),
                None => Ok(None),
            }
        }

        async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<()> {
            let expiry = ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl));
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), expiry));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }
}

//! Password reset codes kept in the shared cache
//!
//! Codes are keyed by email and expire with the cache entry, so every
//! instance of the service sees the same codes.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use common::cache::Cache;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Lifetime of a reset code in seconds
pub const RESET_CODE_TTL_SECONDS: u64 = 15 * 60;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCode {
    code: String,
    expires_at: DateTime<Utc>,
}

/// Issues and checks password reset codes
#[derive(Clone)]
pub struct ResetCodeStore {
    cache: Arc<dyn Cache>,
}

impl ResetCodeStore {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    fn key(email: &str) -> String {
        format!("password_reset:{}", email)
    }

    /// Generate and store a new 6-digit code, replacing any previous one
    pub async fn issue(&self, email: &str) -> Result<String> {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let stored = StoredCode {
            code: code.clone(),
            expires_at: Utc::now() + Duration::seconds(RESET_CODE_TTL_SECONDS as i64),
        };

        self.cache
            .set(
                &Self::key(email),
                &serde_json::to_string(&stored)?,
                Some(RESET_CODE_TTL_SECONDS),
            )
            .await?;

        info!("Issued password reset code for {}", email);
        Ok(code)
    }

    /// Check a code; a mismatched or expired code is discarded
    pub async fn verify(&self, email: &str, code: &str) -> Result<bool> {
        let key = Self::key(email);
        let Some(raw) = self.cache.get(&key).await? else {
            return Ok(false);
        };

        let stored: StoredCode = serde_json::from_str(&raw)?;
        if stored.code != code || stored.expires_at <= Utc::now() {
            self.cache.delete(&key).await?;
            return Ok(false);
        }

        Ok(true)
    }

    /// Remove the code once it has been used
    pub async fn consume(&self, email: &str) -> Result<()> {
        self.cache.delete(&Self::key(email)).await
    }
}

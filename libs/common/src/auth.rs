//! JWT authentication shared by all services
//!
//! Tokens are HS256-signed with a shared secret and carry
//! `{userId, email, role, iat, exp}`. The user service issues them; every
//! other service only verifies them through [`require_auth`].

use anyhow::Result;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

/// Role of a user account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Token lifetime in seconds (default: 7 days)
    pub expires_in: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC secret used to sign and verify tokens (required)
    /// - `JWT_EXPIRES_IN`: Token lifetime in seconds (default: 604800); a
    ///   value that is not a whole number of seconds is an error
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        if secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let expires_in = match std::env::var("JWT_EXPIRES_IN") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                anyhow::anyhow!("JWT_EXPIRES_IN must be a number of seconds, got '{}'", raw)
            })?,
            Err(_) => 604800, // 7 days
        };

        Ok(JwtConfig { secret, expires_in })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate a signed token for a user
    pub fn generate_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now.saturating_add(self.config.expires_in),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> u64 {
        self.config.expires_in
    }
}

/// Reject requests without a valid bearer token
pub async fn require_auth(
    State(jwt_service): State<JwtService>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Access token is required".to_string()))?;

    let claims = jwt_service.validate_token(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}

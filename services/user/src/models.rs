//! User model and request/response payloads

use chrono::{DateTime, NaiveDate, Utc};
use common::auth::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_preferred: bool,
}

/// Mobile phone number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mobile {
    pub country_code: String,
    pub number: String,
}

/// User entity
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[sqlx(json)]
    pub address: Address,
    #[sqlx(json)]
    pub mobile: Mobile,
    pub date_of_birth: NaiveDate,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(json)]
    pub addresses: Vec<Address>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Address,
    pub mobile: Mobile,
    pub date_of_birth: NaiveDate,
    pub password_hash: String,
    pub addresses: Vec<Address>,
    pub role: Role,
}

/// Profile update payload; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<Address>,
    pub mobile: Option<Mobile>,
    pub date_of_birth: Option<NaiveDate>,
    pub addresses: Option<Vec<Address>>,
}

/// Request for user registration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Address,
    pub mobile: Mobile,
    pub date_of_birth: NaiveDate,
    pub password: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
    pub role: Option<Role>,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request for a password reset code
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request to reset a password with a code
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Request to change the password of the signed-in user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Response for forgot-password
#[derive(Debug, Serialize)]
pub struct ResetCodeResponse {
    pub message: String,
    pub code: String,
}

/// Plain message payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

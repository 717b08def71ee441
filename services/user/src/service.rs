//! User account operations

use std::sync::Arc;

use common::{auth::JwtService, error::ApiError};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{AuthResponse, NewUser, RegisterRequest, UpdateProfile, User},
    password::{hash_password, verify_password},
    repositories::UserRepository,
    reset_codes::ResetCodeStore,
};

/// Business errors of the user service
#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("User already exists with this email")]
    AlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired reset code")]
    InvalidResetCode,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::NotFound => ApiError::NotFound(message),
            UserError::AlreadyExists => ApiError::Conflict(message),
            UserError::InvalidCredentials
            | UserError::InvalidResetCode
            | UserError::IncorrectPassword => ApiError::BadRequest(message),
            UserError::Internal(source) => ApiError::Internal(source),
        }
    }
}

pub type UserResult<T> = Result<T, UserError>;

/// Emails are compared and stored lowercased and trimmed
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    reset_codes: ResetCodeStore,
    jwt_service: JwtService,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        reset_codes: ResetCodeStore,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            repository,
            reset_codes,
            jwt_service,
        }
    }

    fn issue_token(&self, user: User) -> UserResult<AuthResponse> {
        let token = self
            .jwt_service
            .generate_token(user.id, &user.email, user.role)?;
        Ok(AuthResponse { user, token })
    }

    /// Create an account and sign it in
    pub async fn register(&self, request: RegisterRequest) -> UserResult<AuthResponse> {
        let email = normalize_email(&request.email);

        if self.repository.find_by_email(&email).await?.is_some() {
            warn!("Registration rejected, email already in use: {}", email);
            return Err(UserError::AlreadyExists);
        }

        let new_user = NewUser {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email,
            address: request.address,
            mobile: request.mobile,
            date_of_birth: request.date_of_birth,
            password_hash: hash_password(&request.password)?,
            addresses: request.addresses,
            role: request.role.unwrap_or_default(),
        };

        // A concurrent registration can take the email after the lookup above
        let Some(user) = self.repository.create(&new_user).await? else {
            warn!("Registration lost a race for email: {}", new_user.email);
            return Err(UserError::AlreadyExists);
        };
        info!(user_id = %user.id, "User registered");

        self.issue_token(user)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, email: &str, password: &str) -> UserResult<AuthResponse> {
        let email = normalize_email(email);

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&user.password_hash, password)? {
            return Err(UserError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_token(user)
    }

    /// Issue a reset code for an existing account
    ///
    /// The code is returned to the caller; there is no mail transport.
    pub async fn forgot_password(&self, email: &str) -> UserResult<String> {
        let email = normalize_email(email);

        if self.repository.find_by_email(&email).await?.is_none() {
            return Err(UserError::NotFound);
        }

        Ok(self.reset_codes.issue(&email).await?)
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> UserResult<()> {
        let email = normalize_email(email);

        if !self.reset_codes.verify(&email, code).await? {
            return Err(UserError::InvalidResetCode);
        }

        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::NotFound)?;

        self.repository
            .update_password(user.id, &hash_password(new_password)?)
            .await?;
        self.reset_codes.consume(&email).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    pub async fn update_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> UserResult<()> {
        let user = self.get_profile(user_id).await?;

        if !verify_password(&user.password_hash, current_password)? {
            return Err(UserError::IncorrectPassword);
        }

        self.repository
            .update_password(user.id, &hash_password(new_password)?)
            .await?;

        info!(user_id = %user.id, "Password updated");
        Ok(())
    }

    /// Merge the provided fields into the profile
    pub async fn update_profile(&self, user_id: Uuid, update: UpdateProfile) -> UserResult<User> {
        let update = UpdateProfile {
            first_name: update.first_name.map(|s| s.trim().to_string()),
            last_name: update.last_name.map(|s| s.trim().to_string()),
            ..update
        };

        self.repository
            .update_profile(user_id, &update)
            .await?
            .ok_or(UserError::NotFound)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)
    }
}

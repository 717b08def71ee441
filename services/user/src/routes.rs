//! User service routes

use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    auth::{AuthUser, require_auth},
    error::{ApiError, ApiResult},
    extract::JsonBody,
    response::{ApiResponse, health, route_not_found},
};
use tracing::info;

use crate::{
    AppState,
    models::{
        ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
        ResetCodeResponse, ResetPasswordRequest, UpdatePasswordRequest, UpdateProfile,
    },
    validation,
};

/// Create the router for the user service
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password));

    let protected = Router::new()
        .route("/password", put(update_password))
        .route("/profile", put(update_profile).get(get_profile))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users", public.merge(protected))
        .fallback(route_not_found)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    health("User service is running")
}

async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_register(&payload).map_err(ApiError::BadRequest)?;
    info!("Registration attempt for: {}", payload.email);

    let result = state.user_service.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(result).with_message("User registered successfully"),
    ))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_login(&payload).map_err(ApiError::BadRequest)?;

    let result = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::success(result).with_message("Login successful"))
}

async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ForgotPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_forgot_password(&payload).map_err(ApiError::BadRequest)?;

    let code = state.user_service.forgot_password(&payload.email).await?;

    Ok(ApiResponse::success(ResetCodeResponse {
        message: "Password reset code sent".to_string(),
        code,
    }))
}

async fn reset_password(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ResetPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_reset_password(&payload).map_err(ApiError::BadRequest)?;

    state
        .user_service
        .reset_password(&payload.email, &payload.code, &payload.new_password)
        .await?;

    Ok(ApiResponse::success(MessageResponse::new(
        "Password reset successfully",
    )))
}

async fn update_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<UpdatePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_update_password(&payload).map_err(ApiError::BadRequest)?;

    state
        .user_service
        .update_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    )))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<UpdateProfile>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_update_profile(&payload).map_err(ApiError::BadRequest)?;

    let profile = state.user_service.update_profile(user.id, payload).await?;

    Ok(ApiResponse::success(profile).with_message("Profile updated successfully"))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.user_service.get_profile(user.id).await?;
    Ok(ApiResponse::success(profile))
}

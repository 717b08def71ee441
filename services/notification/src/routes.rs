//! Notification routes

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use common::{
    auth::require_auth,
    error::{ApiError, ApiResult},
    extract::{JsonBody, PathParam},
    response::{ApiResponse, health, route_not_found},
};
use uuid::Uuid;

use crate::{
    models::{CreateNotificationRequest, UnreadCount},
    state::AppState,
    validation,
};

/// Create the router for the notification service
pub fn create_router(state: AppState) -> Router {
    let notifications = Router::new()
        .route("/notifications", post(send_notification))
        .route("/notifications/user/:user_id", get(get_user_notifications))
        .route(
            "/notifications/user/:user_id/unread",
            get(get_unread_notifications),
        )
        .route(
            "/notifications/user/:user_id/unread/count",
            get(get_unread_count),
        )
        .route("/notifications/:id/read", patch(mark_as_read))
        .route("/notifications/:id/unread", patch(mark_as_unread))
        .route("/notifications/:id", delete(delete_notification))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(notifications)
        .fallback(route_not_found)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    health("Notification service is healthy")
}

async fn send_notification(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateNotificationRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_create_notification(&payload).map_err(ApiError::BadRequest)?;

    let notification = state
        .notification_service
        .send_notification(&payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(notification).with_message("Notification queued successfully"),
    ))
}

async fn get_user_notifications(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<String>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_user_id(&user_id).map_err(ApiError::BadRequest)?;

    let notifications = state
        .notification_service
        .get_notifications_by_user(&user_id)
        .await?;
    Ok(ApiResponse::success(notifications))
}

async fn get_unread_notifications(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<String>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_user_id(&user_id).map_err(ApiError::BadRequest)?;

    let notifications = state
        .notification_service
        .get_unread_notifications(&user_id)
        .await?;
    Ok(ApiResponse::success(notifications))
}

async fn get_unread_count(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<String>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_user_id(&user_id).map_err(ApiError::BadRequest)?;

    let count = state.notification_service.get_unread_count(&user_id).await?;
    Ok(ApiResponse::success(UnreadCount { count }))
}

async fn mark_as_read(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let notification = state.notification_service.mark_as_read(id).await?;
    Ok(ApiResponse::success(notification).with_message("Notification marked as read"))
}

async fn mark_as_unread(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let notification = state.notification_service.mark_as_unread(id).await?;
    Ok(ApiResponse::success(notification).with_message("Notification marked as unread"))
}

async fn delete_notification(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let notification = state.notification_service.delete_notification(id).await?;
    Ok(ApiResponse::success(notification).with_message("Notification deleted successfully"))
}

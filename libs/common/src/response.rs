//! Uniform JSON envelope returned by every service
//!
//! Successful and failed responses share the shape
//! `{success, message?, data?, error?}`; absent fields are omitted.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    /// Attach a human readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Successful response with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    /// Failure response
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Build the health check body for a service
pub fn health(message: &str) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: message.to_string(),
        timestamp: Utc::now(),
    })
}

/// Fallback handler for unmatched routes
pub async fn route_not_found() -> crate::error::ApiError {
    crate::error::ApiError::NotFound("Route not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::success(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_success_with_message() {
        let value = serde_json::to_value(
            ApiResponse::success(vec![1, 2]).with_message("Cart retrieved successfully"),
        )
        .unwrap();
        assert_eq!(value["message"], "Cart retrieved successfully");
        assert_eq!(value["data"], json!([1, 2]));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let value = serde_json::to_value(ApiResponse::error("Route not found")).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Route not found"}));
    }

    #[test]
    fn test_health_body() {
        let Json(body) = health("Order service is running");
        assert!(body.success);
        assert_eq!(body.message, "Order service is running");
    }
}

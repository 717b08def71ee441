//! Analytics routes
//!
//! Reports are read-only and served without authentication.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use common::{
    error::ApiResult,
    response::{ApiResponse, health, route_not_found},
};

use crate::state::AppState;

/// Create the router for the analytics service
pub fn create_router(state: AppState) -> Router {
    let relational = Router::new()
        .route("/users", get(get_user_data))
        .route("/orders", get(get_order_analytics));

    let document = Router::new()
        .route("/user-categories", get(get_user_category_analytics))
        .route("/product-analytics", get(get_product_analytics));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/postgres", relational)
        .nest("/api/mongo", document)
        .fallback(route_not_found)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    health("Analytics service is running")
}

async fn get_user_data(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let report = state.relational_service.user_report().await?;
    Ok(ApiResponse::success(report).with_message("User data retrieved successfully"))
}

async fn get_order_analytics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let report = state.relational_service.order_report().await?;
    Ok(ApiResponse::success(report).with_message("Order analytics retrieved successfully"))
}

async fn get_user_category_analytics(
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let report = state.document_service.user_category_report().await?;
    Ok(ApiResponse::success(report)
        .with_message("User category analytics retrieved successfully"))
}

async fn get_product_analytics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let report = state.document_service.product_report().await?;
    Ok(ApiResponse::success(report).with_message("Product analytics retrieved successfully"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        repositories::memory::{StaticDocument, StaticRelational},
        services::{
            RelationalService,
            document::{DocumentService, tests::store},
            tests::{analytics, recent_order, user},
        },
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(relational: StaticRelational, document: StaticDocument) -> Router {
        create_router(AppState {
            relational_service: RelationalService::new(Arc::new(relational)),
            document_service: DocumentService::new(Arc::new(document)),
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_user_data_without_auth() {
        let relational = StaticRelational {
            users: vec![user(1), user(0)],
            ..Default::default()
        };

        let (status, json) = get(
            app(relational, StaticDocument::default()),
            "/api/postgres/users",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "User data retrieved successfully");
        assert_eq!(json["data"]["summary"]["totalUsers"], 2);
        assert_eq!(json["data"]["summary"]["usersWithOrders"], 1);
        assert_eq!(json["data"]["users"][0]["orders"][0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_order_analytics_shape() {
        let relational = StaticRelational {
            recent_orders: (0..30).map(|_| recent_order()).collect(),
            analytics: Some(analytics()),
            ..Default::default()
        };

        let (status, json) = get(
            app(relational, StaticDocument::default()),
            "/api/postgres/orders",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["analytics"]["totalOrders"], 42);
        assert_eq!(json["data"]["analytics"]["totalRevenue"], "1234.56");
        assert_eq!(json["data"]["recentOrders"].as_array().unwrap().len(), 20);
        assert_eq!(json["data"]["summary"]["totalOrdersProcessed"], 30);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal_error() {
        let (status, json) = get(
            app(StaticRelational::default(), StaticDocument::default()),
            "/api/postgres/orders",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_document_reports() {
        let (status, json) = get(
            app(StaticRelational::default(), store()),
            "/api/mongo/user-categories",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["usersByCategory"][0]["category"], "Electronics");
        assert_eq!(json["data"]["users"].as_array().unwrap().len(), 20);

        let (status, json) = get(
            app(StaticRelational::default(), store()),
            "/api/mongo/product-analytics",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["topCustomers"].as_array().unwrap().len(), 10);
        assert_eq!(json["data"]["orderTrends"][0]["totalOrders"], 3);
        assert_eq!(
            json["data"]["productCategoryAnalytics"][0]["averagePrice"],
            "19.99"
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, json) = get(
            app(StaticRelational::default(), StaticDocument::default()),
            "/api/mysql/users",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Route not found");
    }
}

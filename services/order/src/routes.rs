//! Order and cart routes

use std::str::FromStr;

use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, put},
};
use common::{
    auth::{AuthUser, require_auth},
    error::{ApiError, ApiResult},
    extract::{JsonBody, PathParam},
    response::{ApiResponse, health, route_not_found},
};

use crate::{
    models::{
        CreateOrderRequest, OrderStatus, UpdateOrderStatusRequest,
        cart::{AddToCartRequest, UpdateCartRequest},
    },
    state::AppState,
    validation,
};

/// Create the router for the order service
pub fn create_router(state: AppState) -> Router {
    let orders = Router::new()
        .route("/", get(get_user_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_order_status));

    let cart = Router::new()
        .route("/", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/:id", put(update_cart_item))
        .route("/product/:product_id", delete(remove_from_cart));

    let api = Router::new()
        .nest("/api/orders", orders)
        .nest("/api/cart", cart)
        .route_layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .fallback(route_not_found)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    health("Order service is running")
}

async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_create_order(&payload).map_err(ApiError::BadRequest)?;

    let order = state
        .order_service
        .create_order(user.id, &payload.order_items)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(order).with_message("Order created successfully"),
    ))
}

async fn get_user_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let orders = state.order_service.get_user_orders(user.id).await?;
    Ok(ApiResponse::success(orders).with_message("Orders retrieved successfully"))
}

async fn get_order(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<impl IntoResponse> {
    let order = state.order_service.get_order_by_id(id).await?;
    Ok(ApiResponse::success(order).with_message("Order retrieved successfully"))
}

async fn update_order_status(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateOrderStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let status = OrderStatus::from_str(&payload.status).map_err(ApiError::BadRequest)?;

    let order = state.order_service.update_order_status(id, status).await?;
    Ok(ApiResponse::success(order).with_message("Order status updated successfully"))
}

async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<AddToCartRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_add_to_cart(&payload).map_err(ApiError::BadRequest)?;

    let item = state
        .cart_service
        .add_to_cart(user.id, payload.product_id, payload.price, payload.quantity)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(item).with_message("Item added to cart successfully"),
    ))
}

async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let cart = state.cart_service.get_user_cart(user.id).await?;
    Ok(ApiResponse::success(cart).with_message("Cart retrieved successfully"))
}

async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateCartRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_update_cart(&payload).map_err(ApiError::BadRequest)?;

    let item = state
        .cart_service
        .update_cart_item(user.id, id, payload.quantity)
        .await?;

    Ok(ApiResponse::success(item).with_message("Cart item updated successfully"))
}

async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    PathParam(product_id): PathParam<i32>,
) -> ApiResult<impl IntoResponse> {
    state
        .cart_service
        .remove_from_cart(user.id, product_id)
        .await?;
    Ok(ApiResponse::message("Item removed from cart successfully"))
}

async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    state.cart_service.clear_cart(user.id).await?;
    Ok(ApiResponse::message("Cart cleared successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::memory::{InMemoryCartRepository, InMemoryOrderRepository},
        services::{OrderService, cart::CartService},
    };
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use common::auth::{JwtConfig, JwtService, Role};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn jwt_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expires_in: 3600,
        })
    }

    fn app() -> Router {
        create_router(AppState {
            order_service: OrderService::new(Arc::new(InMemoryOrderRepository::default())),
            cart_service: CartService::new(Arc::new(InMemoryCartRepository::default())),
            jwt_service: jwt_service(),
        })
    }

    fn bearer(user_id: Uuid) -> String {
        let token = jwt_service()
            .generate_token(user_id, "jane@example.com", Role::User)
            .unwrap();
        format!("Bearer {}", token)
    }

    fn request(method: &str, uri: &str, user_id: Uuid, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, bearer(user_id));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_cart_merge_over_http() {
        let app = app();
        let user_id = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/cart",
                user_id,
                Some(json!({"productId": 5, "price": 10.99, "quantity": 2})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/cart",
                user_id,
                Some(json!({"productId": 5, "price": "12.00", "quantity": 1})),
            ))
            .await
            .unwrap();
        let json = read_json(response).await;
        assert_eq!(json["data"]["quantity"], 3);
        assert_eq!(json["data"]["price"], "12.00");

        let response = app
            .oneshot(request("GET", "/api/cart", user_id, None))
            .await
            .unwrap();
        let json = read_json(response).await;
        assert_eq!(json["message"], "Cart retrieved successfully");
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_order_uses_caller() {
        let app = app();
        let user_id = Uuid::new_v4();

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/api/orders",
                user_id,
                Some(json!({"orderItems": [
                    {"productId": 1, "price": "10.99", "quantity": 2},
                    {"productId": 2, "price": "5.00", "quantity": 1}
                ]})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = read_json(response).await;
        assert_eq!(json["data"]["status"], "pending");
        assert_eq!(json["data"]["userId"], user_id.to_string());
        assert_eq!(json["data"]["total"], "26.98");
        assert_eq!(json["data"]["orderItems"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["orderItems"][0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_empty_order_is_400() {
        let response = app()
            .oneshot(request(
                "POST",
                "/api/orders",
                Uuid::new_v4(),
                Some(json!({"orderItems": []})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_status() {
        let response = app()
            .oneshot(request(
                "PUT",
                "/api/orders/1/status",
                Uuid::new_v4(),
                Some(json!({"status": "teleported"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Invalid order status");
    }

    #[tokio::test]
    async fn test_missing_order() {
        let response = app()
            .oneshot(request("GET", "/api/orders/12", Uuid::new_v4(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Order not found");
    }

    #[tokio::test]
    async fn test_cart_quantity_overflow_is_400() {
        let app = app();
        let user_id = Uuid::new_v4();
        let add = |quantity: i32| {
            request(
                "POST",
                "/api/cart",
                user_id,
                Some(json!({"productId": 1, "price": "1.00", "quantity": quantity})),
            )
        };

        let response = app.clone().oneshot(add(i32::MAX)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(add(1)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Cart quantity is too large");
    }

    #[tokio::test]
    async fn test_oversized_price_is_400() {
        let response = app()
            .oneshot(request(
                "POST",
                "/api/orders",
                Uuid::new_v4(),
                Some(json!({"orderItems": [
                    {"productId": 1, "price": "100000000.00", "quantity": 1}
                ]})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Price must not exceed 99999999.99");
    }

    #[tokio::test]
    async fn test_cart_requires_token() {
        let response = app()
            .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

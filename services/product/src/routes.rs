//! Product service routes

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use common::{
    auth::require_auth,
    error::{ApiError, ApiResult},
    extract::{JsonBody, PathParam, QueryParams},
    response::{ApiResponse, health, route_not_found},
};

use crate::{
    models::{
        CreateProductRequest, ProductQuery, UpdateProductRequest,
        category::{CreateCategoryRequest, UpdateCategoryRequest},
    },
    state::AppState,
    validation,
};

/// Create the router for the product service
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
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
    health("Product service is running")
}

async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_create_product(&payload).map_err(ApiError::BadRequest)?;

    let product = state.product_service.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(product).with_message("Product created successfully"),
    ))
}

async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> ApiResult<impl IntoResponse> {
    let products = match query.category_id {
        Some(category_id) => state.product_service.find_by_category(category_id).await?,
        None => state.product_service.find_all().await?,
    };

    Ok(ApiResponse::success(products))
}

async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<impl IntoResponse> {
    let product = state.product_service.find_by_id(id).await?;
    Ok(ApiResponse::success(product))
}

async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateProductRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_update_product(&payload).map_err(ApiError::BadRequest)?;

    let product = state.product_service.update(id, payload).await?;
    Ok(ApiResponse::success(product).with_message("Product updated successfully"))
}

async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<impl IntoResponse> {
    state.product_service.delete(id).await?;
    Ok(ApiResponse::message("Product deleted successfully"))
}

async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_create_category(&payload).map_err(ApiError::BadRequest)?;

    let category = state.category_service.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(category).with_message("Category created successfully"),
    ))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let categories = state.category_service.find_all().await?;
    Ok(ApiResponse::success(categories))
}

async fn get_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<impl IntoResponse> {
    let category = state.category_service.find_by_id(id).await?;
    Ok(ApiResponse::success(category))
}

async fn update_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_update_category(&payload).map_err(ApiError::BadRequest)?;

    let category = state.category_service.update(id, payload).await?;
    Ok(ApiResponse::success(category).with_message("Category updated successfully"))
}

async fn delete_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<impl IntoResponse> {
    state.category_service.delete(id).await?;
    Ok(ApiResponse::message("Category deleted successfully"))
}

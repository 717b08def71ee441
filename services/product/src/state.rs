//! Application state shared across handlers

use common::auth::JwtService;

use crate::services::{ProductService, category::CategoryService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub category_service: CategoryService,
    pub jwt_service: JwtService,
}

//! Application state shared across handlers

use common::auth::JwtService;

use crate::services::{OrderService, cart::CartService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub order_service: OrderService,
    pub cart_service: CartService,
    pub jwt_service: JwtService,
}

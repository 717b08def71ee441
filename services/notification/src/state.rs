//! Application state shared across handlers

use common::auth::JwtService;

use crate::service::NotificationService;

#[derive(Clone)]
pub struct AppState {
    pub notification_service: NotificationService,
    pub jwt_service: JwtService,
}

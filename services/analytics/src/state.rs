//! Application state shared across handlers

use crate::services::{RelationalService, document::DocumentService};

#[derive(Clone)]
pub struct AppState {
    pub relational_service: RelationalService,
    pub document_service: DocumentService,
}

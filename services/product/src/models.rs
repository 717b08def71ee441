//! Catalog models for request and response payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod category;

pub use category::Category;

/// Product with its owning category
///
/// Also the cached representation, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub category_id: i32,
    pub category: Category,
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for product creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub category_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub amount: Decimal,
    pub currency: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial product update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub category_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Query parameters for product listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Filter by category ID
    pub category_id: Option<i32>,
}

/// Default currency code for new products
pub const DEFAULT_CURRENCY: &str = "USD";

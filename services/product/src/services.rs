//! Catalog business logic
//!
//! Product listings are served cache-aside: read the cached JSON, fall back
//! to the repository on a miss and store the result for [`PRODUCT_CACHE_TTL`]
//! seconds. Every write invalidates the keys whose result set it changes.

use std::sync::Arc;

use common::{cache::Cache, error::ApiError};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    models::{CreateProductRequest, Product, UpdateProductRequest},
    repositories::{ProductRepository, category::CategoryRepository},
};

pub mod category;

/// Lifetime of cached product listings in seconds
pub const PRODUCT_CACHE_TTL: u64 = 300;

/// Cache key of the full product listing
pub const ALL_PRODUCTS_KEY: &str = "products:all";

/// Cache key of a category's product listing
pub fn category_key(category_id: i32) -> String {
    format!("products:category:{}", category_id)
}

/// Drop the listings that embed products of `category_id`
async fn invalidate_listings(cache: &dyn Cache, category_id: i32) -> CatalogResult<()> {
    cache.delete(&category_key(category_id)).await?;
    cache.delete(ALL_PRODUCTS_KEY).await?;
    Ok(())
}

/// Business errors of the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product with ID {0} not found")]
    ProductNotFound(i32),

    #[error("Category with ID {0} not found")]
    CategoryNotFound(i32),

    #[error("Parent category with ID {0} does not exist")]
    UnknownParent(i32),

    #[error("Category cannot be its own ancestor")]
    CategoryCycle,

    #[error("Category with ID {0} still has products")]
    CategoryInUse(i32),

    #[error("Category with ID {0} does not exist")]
    UnknownCategory(i32),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::ProductNotFound(_) | CatalogError::CategoryNotFound(_) => {
                ApiError::NotFound(message)
            }
            CatalogError::UnknownParent(_)
            | CatalogError::CategoryCycle
            | CatalogError::CategoryInUse(_)
            | CatalogError::UnknownCategory(_) => ApiError::BadRequest(message),
            CatalogError::Internal(source) => ApiError::Internal(source),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    cache: Arc<dyn Cache>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            products,
            categories,
            cache,
        }
    }

    /// Read a cached value; failures count as a miss
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!("Cache hit for {}", key);
                    Some(value)
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Store a value; failures are logged and ignored
    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        let result = match serde_json::to_string(value) {
            Ok(raw) => self.cache.set(key, &raw, Some(PRODUCT_CACHE_TTL)).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }

    async fn invalidate_category(&self, category_id: i32) -> CatalogResult<()> {
        invalidate_listings(self.cache.as_ref(), category_id).await
    }

    async fn ensure_category(&self, category_id: i32) -> CatalogResult<()> {
        if self.categories.find_by_id(category_id).await?.is_none() {
            return Err(CatalogError::UnknownCategory(category_id));
        }
        Ok(())
    }

    pub async fn create(&self, request: CreateProductRequest) -> CatalogResult<Product> {
        self.ensure_category(request.category_id).await?;

        let product = self.products.create(&request).await?;
        self.invalidate_category(product.category_id).await?;

        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    pub async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        if let Some(products) = self.cached(ALL_PRODUCTS_KEY).await {
            return Ok(products);
        }

        let products = self.products.find_all().await?;
        self.store(ALL_PRODUCTS_KEY, &products).await;
        Ok(products)
    }

    pub async fn find_by_category(&self, category_id: i32) -> CatalogResult<Vec<Product>> {
        let key = category_key(category_id);
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let products = self.products.find_by_category(category_id).await?;
        self.store(&key, &products).await;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: i32) -> CatalogResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn update(&self, id: i32, request: UpdateProductRequest) -> CatalogResult<Product> {
        let existing = self.find_by_id(id).await?;
        if let Some(category_id) = request.category_id {
            self.ensure_category(category_id).await?;
        }

        let updated = self
            .products
            .update(id, &request)
            .await?
            .ok_or(CatalogError::ProductNotFound(id))?;

        self.invalidate_category(existing.category_id).await?;
        if updated.category_id != existing.category_id {
            self.cache.delete(&category_key(updated.category_id)).await?;
        }

        info!(product_id = id, "Product updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        let product = self.find_by_id(id).await?;

        self.products.delete(id).await?;
        self.invalidate_category(product.category_id).await?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }
}

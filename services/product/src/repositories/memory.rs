use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;

use super::{ProductRepository, category::CategoryRepository};
use crate::models::{
    Category, CreateProductRequest, DEFAULT_CURRENCY, Product, UpdateProductRequest,
    category::{CreateCategoryRequest, UpdateCategoryRequest},
};

#[derive(Default)]
struct Store {
    categories: Vec<Category>,
    products: Vec<Product>,
    next_category_id: i32,
    next_product_id: i32,
}

/// In-memory catalog backing both repository traits in tests
#[derive(Default)]
pub struct InMemoryCatalog {
    store: Mutex<Store>,
    list_queries: AtomicUsize,
}

impl InMemoryCatalog {
    /// Number of `find_all`/`find_by_category` calls that reached the store
    pub fn list_queries(&self) -> usize {
        self.list_queries.load(Ordering::SeqCst)
    }
}

impl Store {
    fn category(&self, id: i32) -> Result<Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("foreign key violation: category {}", id))
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn create(&self, request: &CreateProductRequest) -> Result<Product> {
        let mut store = self.store.lock().unwrap();
        let category = store.category(request.category_id)?;
        store.next_product_id += 1;

        let now = Utc::now();
        let product = Product {
            id: store.next_product_id,
            category_id: category.id,
            category,
            title: request.title.clone(),
            description: request.description.clone(),
            summary: request.summary.clone(),
            amount: request.amount,
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            images: request.images.clone(),
            tags: request.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        store.products.push(product.clone());
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        self.list_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.lock().unwrap().products.clone())
    }

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<Product>> {
        self.list_queries.fetch_add(1, Ordering::SeqCst);
        let store = self.store.lock().unwrap();
        Ok(store
            .products
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>> {
        let store = self.store.lock().unwrap();
        Ok(store.products.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: i32, request: &UpdateProductRequest) -> Result<Option<Product>> {
        let mut store = self.store.lock().unwrap();
        let category = match request.category_id {
            Some(category_id) => Some(store.category(category_id)?),
            None => None,
        };
        let Some(product) = store.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(category) = category {
            product.category_id = category.id;
            product.category = category;
        }
        if let Some(title) = &request.title {
            product.title = title.clone();
        }
        if let Some(description) = &request.description {
            product.description = Some(description.clone());
        }
        if let Some(summary) = &request.summary {
            product.summary = Some(summary.clone());
        }
        if let Some(amount) = request.amount {
            product.amount = amount;
        }
        if let Some(currency) = &request.currency {
            product.currency = currency.clone();
        }
        if let Some(images) = &request.images {
            product.images = images.clone();
        }
        if let Some(tags) = &request.tags {
            product.tags = tags.clone();
        }
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.products.len();
        store.products.retain(|p| p.id != id);
        Ok(store.products.len() < before)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn create(&self, request: &CreateCategoryRequest) -> Result<Category> {
        let mut store = self.store.lock().unwrap();
        store.next_category_id += 1;

        let now = Utc::now();
        let category = Category {
            id: store.next_category_id,
            name: request.name.clone(),
            description: request.description.clone(),
            parent_category_id: request.parent_category_id,
            tags: request.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        store.categories.push(category.clone());
        Ok(category)
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        Ok(self.store.lock().unwrap().categories.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>> {
        let store = self.store.lock().unwrap();
        Ok(store.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn update(
        &self,
        id: i32,
        request: &UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        let mut store = self.store.lock().unwrap();
        let Some(category) = store.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &request.name {
            category.name = name.clone();
        }
        if let Some(description) = &request.description {
            category.description = Some(description.clone());
        }
        if let Some(parent) = request.parent_category_id {
            category.parent_category_id = Some(parent);
        }
        if let Some(tags) = &request.tags {
            category.tags = tags.clone();
        }
        category.updated_at = Utc::now();

        // products embed their category the way the SQL join does
        let category = category.clone();
        for product in store.products.iter_mut().filter(|p| p.category_id == id) {
            product.category = category.clone();
        }

        Ok(Some(category))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.categories.len();
        store.categories.retain(|c| c.id != id);
        Ok(store.categories.len() < before)
    }

    async fn has_products(&self, id: i32) -> Result<bool> {
        let store = self.store.lock().unwrap();
        Ok(store.products.iter().any(|p| p.category_id == id))
    }
}

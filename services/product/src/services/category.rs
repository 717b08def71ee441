//! Category management

use std::{collections::HashSet, sync::Arc};

use common::cache::Cache;
use tracing::info;

use super::{CatalogError, CatalogResult, invalidate_listings};
use crate::{
    models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    repositories::category::CategoryRepository,
};

#[derive(Clone)]
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    cache: Arc<dyn Cache>,
}

impl CategoryService {
    /// `cache` is the product listing cache; cached products embed their category
    pub fn new(repository: Arc<dyn CategoryRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { repository, cache }
    }

    /// Reject a parent that is missing, or whose ancestor chain reaches `id`
    async fn check_parent(&self, id: Option<i32>, parent_id: i32) -> CatalogResult<()> {
        if Some(parent_id) == id {
            return Err(CatalogError::CategoryCycle);
        }

        let mut seen = HashSet::new();
        let mut current = Some(parent_id);
        while let Some(ancestor_id) = current {
            if !seen.insert(ancestor_id) {
                break;
            }

            let ancestor = self
                .repository
                .find_by_id(ancestor_id)
                .await?
                .ok_or(CatalogError::UnknownParent(ancestor_id))?;

            if id.is_some() && ancestor.parent_category_id == id {
                return Err(CatalogError::CategoryCycle);
            }
            current = ancestor.parent_category_id;
        }

        Ok(())
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> CatalogResult<Category> {
        if let Some(parent_id) = request.parent_category_id {
            self.check_parent(None, parent_id).await?;
        }

        let category = self.repository.create(&request).await?;
        info!(category_id = category.id, "Category created");
        Ok(category)
    }

    pub async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn find_by_id(&self, id: i32) -> CatalogResult<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateCategoryRequest,
    ) -> CatalogResult<Category> {
        self.find_by_id(id).await?;
        if let Some(parent_id) = request.parent_category_id {
            self.check_parent(Some(id), parent_id).await?;
        }

        let category = self
            .repository
            .update(id, &request)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))?;

        invalidate_listings(self.cache.as_ref(), id).await?;
        Ok(category)
    }

    pub async fn delete(&self, id: i32) -> CatalogResult<()> {
        self.find_by_id(id).await?;
        if self.repository.has_products(id).await? {
            return Err(CatalogError::CategoryInUse(id));
        }

        self.repository.delete(id).await?;
        invalidate_listings(self.cache.as_ref(), id).await?;
        info!(category_id = id, "Category deleted");
        Ok(())
    }
}

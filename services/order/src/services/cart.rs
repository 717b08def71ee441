//! Cart operations

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::{OrderError, OrderResult};
use crate::{models::cart::CartItem, repositories::cart::CartRepository};

#[derive(Clone)]
pub struct CartService {
    repository: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(repository: Arc<dyn CartRepository>) -> Self {
        Self { repository }
    }

    /// Add a product, merging with an existing row for the same product
    ///
    /// Quantities add up and the latest price wins.
    pub async fn add_to_cart(
        &self,
        user_id: Uuid,
        product_id: i32,
        price: Decimal,
        quantity: i32,
    ) -> OrderResult<CartItem> {
        let item = self
            .repository
            .merge_item(user_id, product_id, price, quantity)
            .await?
            .ok_or(OrderError::QuantityTooLarge)?;

        info!(
            cart_id = item.id,
            product_id,
            quantity = item.quantity,
            "Cart row merged"
        );
        Ok(item)
    }

    pub async fn get_user_cart(&self, user_id: Uuid) -> OrderResult<Vec<CartItem>> {
        Ok(self.repository.find_by_user(user_id).await?)
    }

    pub async fn update_cart_item(
        &self,
        user_id: Uuid,
        cart_id: i32,
        quantity: i32,
    ) -> OrderResult<CartItem> {
        self.repository
            .update_quantity(user_id, cart_id, quantity)
            .await?
            .ok_or(OrderError::CartItemNotFound)
    }

    pub async fn remove_from_cart(&self, user_id: Uuid, product_id: i32) -> OrderResult<()> {
        self.repository
            .remove_by_user_and_product(user_id, product_id)
            .await?;
        Ok(())
    }

    pub async fn clear_cart(&self, user_id: Uuid) -> OrderResult<()> {
        let removed = self.repository.clear(user_id).await?;
        info!(user_id = %user_id, removed, "Cart cleared");
        Ok(())
    }
}

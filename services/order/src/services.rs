//! Order business logic

use std::sync::Arc;

use common::error::ApiError;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{NewOrderItem, Order, OrderStatus},
    repositories::OrderRepository,
};

pub mod cart;

/// Business errors of the order service
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Order not found")]
    OrderNotFound,

    #[error("Cart item not found")]
    CartItemNotFound,

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Cart quantity is too large")]
    QuantityTooLarge,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::OrderNotFound | OrderError::CartItemNotFound => {
                ApiError::NotFound(message)
            }
            OrderError::EmptyOrder | OrderError::QuantityTooLarge => {
                ApiError::BadRequest(message)
            }
            OrderError::Internal(source) => ApiError::Internal(source),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

#[derive(Clone)]
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Place a pending order with the submitted lines verbatim
    pub async fn create_order(
        &self,
        user_id: Uuid,
        items: &[NewOrderItem],
    ) -> OrderResult<Order> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let order = self.repository.create_with_items(user_id, items).await?;
        info!(order_id = order.id, user_id = %user_id, "Order placed");
        Ok(order)
    }

    pub async fn get_order_by_id(&self, id: i32) -> OrderResult<Order> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(OrderError::OrderNotFound)
    }

    pub async fn get_user_orders(&self, user_id: Uuid) -> OrderResult<Vec<Order>> {
        Ok(self.repository.find_by_user(user_id).await?)
    }

    pub async fn update_order_status(&self, id: i32, status: OrderStatus) -> OrderResult<Order> {
        self.repository
            .update_status(id, status)
            .await?
            .ok_or(OrderError::OrderNotFound)
    }
}

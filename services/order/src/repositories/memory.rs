use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{OrderRepository, cart::CartRepository};
use crate::models::{
    NewOrderItem, Order, OrderItem, OrderItemStatus, OrderRecord, OrderStatus, cart::CartItem,
};

/// In-memory cart rows for service tests
#[derive(Default)]
pub struct InMemoryCartRepository {
    rows: Mutex<Vec<CartItem>>,
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn merge_item(
        &self,
        user_id: Uuid,
        product_id: i32,
        price: Decimal,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();

        if let Some(row) = rows
            .iter_mut()
            .find(|r| r.user_id == user_id && r.product_id == product_id)
        {
            let Some(merged) = row.quantity.checked_add(quantity) else {
                return Ok(None);
            };
            row.quantity = merged;
            row.price = price;
            row.updated_at = now;
            return Ok(Some(row.clone()));
        }

        let item = CartItem {
            id: rows.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            user_id,
            product_id,
            price,
            quantity,
            created_at: now,
            updated_at: now,
        };
        rows.push(item.clone());
        Ok(Some(item))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<CartItem>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|r| r.user_id == user_id).cloned().collect())
    }

    async fn update_quantity(
        &self,
        user_id: Uuid,
        id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .map(|row| {
                row.quantity = quantity;
                row.clone()
            }))
    }

    async fn remove_by_user_and_product(&self, user_id: Uuid, product_id: i32) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.user_id == user_id && r.product_id == product_id));
        Ok(rows.len() < before)
    }

    async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

/// In-memory orders for service tests
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<(OrderRecord, Vec<OrderItem>)>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_with_items(&self, user_id: Uuid, items: &[NewOrderItem]) -> Result<Order> {
        let mut orders = self.orders.lock().unwrap();
        let now = Utc::now();
        let order_id = orders.len() as i32 + 1;
        let first_item_id = orders.iter().map(|(_, items)| items.len()).sum::<usize>() as i32 + 1;

        let record = OrderRecord {
            id: order_id,
            user_id,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let order_items: Vec<OrderItem> = items
            .iter()
            .zip(first_item_id..)
            .map(|(item, id)| OrderItem {
                id,
                order_id,
                product_id: item.product_id,
                price: item.price,
                quantity: item.quantity,
                status: OrderItemStatus::Pending,
                created_at: now,
                updated_at: now,
            })
            .collect();

        orders.push((record.clone(), order_items.clone()));
        Ok(Order::new(record, order_items))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .iter()
            .find(|(record, _)| record.id == id)
            .map(|(record, items)| Order::new(record.clone(), items.clone())))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .iter()
            .rev()
            .filter(|(record, _)| record.user_id == user_id)
            .map(|(record, items)| Order::new(record.clone(), items.clone()))
            .collect())
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        Ok(orders
            .iter_mut()
            .find(|(record, _)| record.id == id)
            .map(|(record, items)| {
                record.status = status;
                record.updated_at = Utc::now();
                Order::new(record.clone(), items.clone())
            }))
    }
}

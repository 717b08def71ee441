//! Input validation utilities

use rust_decimal::Decimal;

use crate::models::{
    CreateOrderRequest, NewOrderItem,
    cart::{AddToCartRequest, UpdateCartRequest},
};

fn validate_positive(field: &str, value: i32) -> Result<(), String> {
    if value <= 0 {
        return Err(format!("{} must be a positive integer", field));
    }
    Ok(())
}

/// Largest value a `NUMERIC(10, 2)` column holds
fn max_price() -> Decimal {
    Decimal::new(99_999_999_99, 2)
}

/// Positive, with at most two decimal places, fitting `NUMERIC(10, 2)`
pub fn validate_price(price: Decimal) -> Result<(), String> {
    if price <= Decimal::ZERO {
        return Err("Price must be a positive number".to_string());
    }
    if price > max_price() {
        return Err(format!("Price must not exceed {}", max_price()));
    }
    if price.normalize().scale() > 2 {
        return Err("Price must have at most two decimal places".to_string());
    }
    Ok(())
}

pub fn validate_add_to_cart(request: &AddToCartRequest) -> Result<(), String> {
    validate_positive("Product ID", request.product_id)?;
    validate_price(request.price)?;
    validate_positive("Quantity", request.quantity)
}

pub fn validate_update_cart(request: &UpdateCartRequest) -> Result<(), String> {
    validate_positive("Quantity", request.quantity)
}

fn validate_order_item(item: &NewOrderItem) -> Result<(), String> {
    validate_positive("Product ID", item.product_id)?;
    validate_price(item.price)?;
    validate_positive("Quantity", item.quantity)
}

pub fn validate_create_order(request: &CreateOrderRequest) -> Result<(), String> {
    if request.order_items.is_empty() {
        return Err("Order must contain at least one item".to_string());
    }
    request.order_items.iter().try_for_each(validate_order_item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn add(product_id: i32, price: &str, quantity: i32) -> AddToCartRequest {
        AddToCartRequest {
            product_id,
            price: Decimal::from_str(price).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_validate_add_to_cart() {
        assert!(validate_add_to_cart(&add(1, "10.99", 2)).is_ok());
        assert_eq!(
            validate_add_to_cart(&add(0, "10.99", 2)),
            Err("Product ID must be a positive integer".to_string())
        );
        assert!(validate_add_to_cart(&add(1, "10.999", 2)).is_err());
        assert!(validate_add_to_cart(&add(1, "0", 2)).is_err());
        assert!(validate_add_to_cart(&add(1, "1.00", -1)).is_err());
    }

    #[test]
    fn test_price_fits_column() {
        assert!(validate_price(Decimal::from_str("99999999.99").unwrap()).is_ok());
        assert_eq!(
            validate_price(Decimal::from_str("100000000").unwrap()),
            Err("Price must not exceed 99999999.99".to_string())
        );
        assert!(validate_price(Decimal::from_str("123456789.00").unwrap()).is_err());
    }

    #[test]
    fn test_validate_create_order() {
        let empty = CreateOrderRequest {
            order_items: Vec::new(),
        };
        assert!(validate_create_order(&empty).is_err());

        let request = CreateOrderRequest {
            order_items: vec![NewOrderItem {
                product_id: 1,
                price: Decimal::from_str("12.00").unwrap(),
                quantity: 0,
            }],
        };
        assert_eq!(
            validate_create_order(&request),
            Err("Quantity must be a positive integer".to_string())
        );
    }
}

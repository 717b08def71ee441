//! Input validation utilities

use rust_decimal::Decimal;

use crate::models::{
    CreateProductRequest, UpdateProductRequest,
    category::{CreateCategoryRequest, UpdateCategoryRequest},
};

fn validate_title(title: &str) -> Result<(), String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }
    if title.chars().count() > 255 {
        return Err("Title must be at most 255 characters long".to_string());
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if name.chars().count() > 255 {
        return Err("Name must be at most 255 characters long".to_string());
    }
    Ok(())
}

/// Largest value a `NUMERIC(10, 2)` column holds
fn max_amount() -> Decimal {
    Decimal::new(99_999_999_99, 2)
}

/// Positive, with at most two decimal places, fitting `NUMERIC(10, 2)`
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be a positive number".to_string());
    }
    if amount > max_amount() {
        return Err(format!("Amount must not exceed {}", max_amount()));
    }
    if amount.normalize().scale() > 2 {
        return Err("Amount must have at most two decimal places".to_string());
    }
    Ok(())
}

/// Three-letter currency code
pub fn validate_currency(currency: &str) -> Result<(), String> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("Currency must be a 3-letter code".to_string());
    }
    Ok(())
}

fn validate_id(field: &str, id: i32) -> Result<(), String> {
    if id <= 0 {
        return Err(format!("{} must be a positive integer", field));
    }
    Ok(())
}

pub fn validate_create_product(request: &CreateProductRequest) -> Result<(), String> {
    validate_id("Category ID", request.category_id)?;
    validate_title(&request.title)?;
    validate_amount(request.amount)?;
    if let Some(currency) = &request.currency {
        validate_currency(currency)?;
    }
    Ok(())
}

pub fn validate_update_product(request: &UpdateProductRequest) -> Result<(), String> {
    if let Some(category_id) = request.category_id {
        validate_id("Category ID", category_id)?;
    }
    if let Some(title) = &request.title {
        validate_title(title)?;
    }
    if let Some(amount) = request.amount {
        validate_amount(amount)?;
    }
    if let Some(currency) = &request.currency {
        validate_currency(currency)?;
    }
    Ok(())
}

pub fn validate_create_category(request: &CreateCategoryRequest) -> Result<(), String> {
    validate_name(&request.name)?;
    if let Some(parent) = request.parent_category_id {
        validate_id("Parent category ID", parent)?;
    }
    Ok(())
}

pub fn validate_update_category(request: &UpdateCategoryRequest) -> Result<(), String> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(parent) = request.parent_category_id {
        validate_id("Parent category ID", parent)?;
    }
    Ok(())
}

//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{
    Address, ForgotPasswordRequest, LoginRequest, Mobile, RegisterRequest, ResetPasswordRequest,
    UpdatePasswordRequest, UpdateProfile,
};

/// Validate a first or last name
pub fn validate_name(field: &str, name: &str) -> Result<(), String> {
    let length = name.trim().chars().count();

    if length == 0 {
        return Err(format!("{} is required", field));
    }

    if !(2..=50).contains(&length) {
        return Err(format!("{} must be between 2 and 50 characters", field));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();

    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 100 {
        return Err("Password must be at most 100 characters long".to_string());
    }

    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

/// Validate a postal address
pub fn validate_address(address: &Address) -> Result<(), String> {
    require("Street", &address.street)?;
    require("City", &address.city)?;
    require("State", &address.state)?;
    require("Zip code", &address.zip_code)?;
    require("Country", &address.country)?;
    Ok(())
}

/// Validate a mobile number
pub fn validate_mobile(mobile: &Mobile) -> Result<(), String> {
    require("Country code", &mobile.country_code)?;
    require("Mobile number", &mobile.number)?;

    if !mobile.number.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return Err("Mobile number can only contain digits, spaces and dashes".to_string());
    }

    Ok(())
}

pub fn validate_register(request: &RegisterRequest) -> Result<(), String> {
    validate_name("First name", &request.first_name)?;
    validate_name("Last name", &request.last_name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    validate_address(&request.address)?;
    validate_mobile(&request.mobile)?;
    request.addresses.iter().try_for_each(validate_address)
}

pub fn validate_login(request: &LoginRequest) -> Result<(), String> {
    validate_email(&request.email)?;
    require("Password", &request.password)
}

pub fn validate_forgot_password(request: &ForgotPasswordRequest) -> Result<(), String> {
    validate_email(&request.email)
}

pub fn validate_reset_password(request: &ResetPasswordRequest) -> Result<(), String> {
    validate_email(&request.email)?;

    if request.code.chars().count() != 6 {
        return Err("Reset code must be 6 characters".to_string());
    }

    validate_password(&request.new_password)
}

pub fn validate_update_password(request: &UpdatePasswordRequest) -> Result<(), String> {
    require("Current password", &request.current_password)?;
    validate_password(&request.new_password)
}

/// Only the provided fields are checked
pub fn validate_update_profile(update: &UpdateProfile) -> Result<(), String> {
    if let Some(first_name) = &update.first_name {
        validate_name("First name", first_name)?;
    }
    if let Some(last_name) = &update.last_name {
        validate_name("Last name", last_name)?;
    }
    if let Some(address) = &update.address {
        validate_address(address)?;
    }
    if let Some(mobile) = &update.mobile {
        validate_mobile(mobile)?;
    }
    if let Some(addresses) = &update.addresses {
        addresses.iter().try_for_each(validate_address)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("First name", "Jo").is_ok());
        assert!(validate_name("First name", "J").is_err());
        assert!(validate_name("First name", "   ").is_err());
        assert!(validate_name("First name", &"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("  User@Example.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_mobile() {
        let mobile = Mobile {
            country_code: "+1".to_string(),
            number: "555-0100".to_string(),
        };
        assert!(validate_mobile(&mobile).is_ok());

        let bad = Mobile {
            number: "call me".to_string(),
            ..mobile
        };
        assert!(validate_mobile(&bad).is_err());
    }

    #[test]
    fn test_reset_code_length() {
        let request = ResetPasswordRequest {
            email: "user@example.com".to_string(),
            code: "12345".to_string(),
            new_password: "newsecret".to_string(),
        };
        assert_eq!(
            validate_reset_password(&request),
            Err("Reset code must be 6 characters".to_string())
        );
    }

    #[test]
    fn test_partial_profile_checks_present_fields_only() {
        assert!(validate_update_profile(&UpdateProfile::default()).is_ok());

        let update = UpdateProfile {
            last_name: Some("X".to_string()),
            ..Default::default()
        };
        assert!(validate_update_profile(&update).is_err());
    }
}

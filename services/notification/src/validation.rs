//! Input validation utilities

use crate::models::CreateNotificationRequest;

fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

pub fn validate_user_id(user_id: &str) -> Result<(), String> {
    validate_required("User ID", user_id)
}

pub fn validate_create_notification(request: &CreateNotificationRequest) -> Result<(), String> {
    validate_user_id(&request.user_id)?;
    validate_required("Title", &request.title)?;
    validate_required("Description", &request.description)
}

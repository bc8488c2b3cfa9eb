use crate::common::error::ApiError;

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;

/// Validate a mess name (checked after trimming)
pub fn validate_mess_name(name: &str) -> Result<(), ApiError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiError::ValidationError(
            "Mess name cannot be empty".to_string(),
        ));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::ValidationError(format!(
            "Mess name exceeds maximum length of {} characters",
            MAX_NAME_LEN
        )));
    }

    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), ApiError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(ApiError::ValidationError(
            format!(
                "Description exceeds maximum length of {} characters",
                MAX_DESCRIPTION_LEN
            ),
        )),
        _ => Ok(()),
    }
}

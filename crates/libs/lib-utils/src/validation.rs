//! # Validation Utilities
//!
//! Input validation helpers. Each returns a human readable reason on failure;
//! callers attach the field name to their own error type.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate email format.
///
/// Accepts `local@domain.tld`: exactly one `@`, no whitespace, a non-empty
/// local part and a dotted domain whose labels are non-empty.
pub fn validate_email(email: &str) -> Result<(), String> {
    let invalid = || Err("Invalid email format".to_string());

    if email.chars().any(char::is_whitespace) {
        return invalid();
    }

    let Some((local, domain)) = email.split_once('@') else {
        return invalid();
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return invalid();
    }

    if domain.split('.').any(str::is_empty) {
        return invalid();
    }

    Ok(())
}

/// Validate minimum length (in characters).
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{} must be at least {} characters", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate that the length (in characters) lies within `min..=max`.
pub fn validate_length(value: &str, min: usize, max: usize, field_name: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        Err(format!(
            "{} must be between {} and {} characters",
            field_name, min, max
        ))
    } else {
        Ok(())
    }
}

/// Validate that a string only contains ASCII letters and digits.
pub fn validate_alphanumeric(value: &str, field_name: &str) -> Result<(), String> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(format!("{} may only contain letters and digits", field_name))
    }
}

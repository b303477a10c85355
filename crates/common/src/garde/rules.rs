//! Reusable building blocks for `#[garde(custom(...))]` field rules.

/// Fails with `message` unless `value` has between `min` and `max` characters
pub fn length_between(value: &str, min: usize, max: usize, message: &str) -> garde::Result {
    let length = value.chars().count();
    if length < min || length > max {
        return Err(garde::Error::new(message.to_string()));
    }
    Ok(())
}

/// Fails when a required field is empty
pub fn required(value: &str, field: &str) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new(format!(
            "Validation failed for field '{}': required",
            field
        )));
    }
    Ok(())
}

/// Fails when an identifier is empty
pub fn not_empty_id(value: &str, field: &str) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new(format!(
            "Field '{}' is empty. Please enter a value",
            field
        )));
    }
    Ok(())
}

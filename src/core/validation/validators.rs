//! Reusable field validators
//!
//! Each validator takes the field name and the already-filtered value and
//! returns a human-readable message on failure.

use crate::core::field::FieldFormat;

/// Validator: field must be non-empty
pub fn required() -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &str| {
        if value.is_empty() {
            Err(format!("'{}' is required", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: field must match a format
pub fn format(format: FieldFormat) -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &str| {
        if format.validate(value) {
            Ok(())
        } else {
            Err(format!("'{}' has an invalid format", field))
        }
    }
}

/// Validator: string length must not exceed maximum (in characters)
pub fn max_length(max: usize) -> impl Fn(&str, &str) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &str| {
        let len = value.chars().count();
        if len > max {
            Err(format!(
                "'{}' must not exceed {} characters (currently: {})",
                field, max, len
            ))
        } else {
            Ok(())
        }
    }
}

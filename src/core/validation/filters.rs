//! Reusable string filters
//!
//! These filters normalize raw input before validation

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| value.trim().to_string()
}

/// Filter: trim, then convert to lowercase
pub fn lowercase() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| value.trim().to_lowercase()
}

/// Filter: trim, then convert to uppercase
pub fn uppercase() -> impl Fn(&str) -> String + Send + Sync + Clone {
    |value: &str| value.trim().to_uppercase()
}

/// Apply a filter to an optional field, mapping absent values to ""
pub fn apply(filter: impl Fn(&str) -> String, value: Option<&str>) -> String {
    value.map(filter).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_removes_whitespace() {
        let f = trim();
        assert_eq!(f("  hello  "), "hello");
    }

    #[test]
    fn test_trim_whitespace_only_becomes_empty() {
        let f = trim();
        assert_eq!(f("   "), "");
    }

    #[test]
    fn test_lowercase_trims_and_folds() {
        let f = lowercase();
        assert_eq!(f("  Jane@X.COM "), "jane@x.com");
    }

    #[test]
    fn test_uppercase_trims_and_folds() {
        let f = uppercase();
        assert_eq!(f(" inr"), "INR");
    }

    #[test]
    fn test_apply_absent_is_empty() {
        assert_eq!(apply(trim(), None), "");
        assert_eq!(apply(trim(), Some(" x ")), "x");
    }
}

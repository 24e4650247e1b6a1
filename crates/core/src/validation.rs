//! Field-level validation helpers shared by the entity modules.

use crate::error::CoreError;
use crate::types::Amount;

/// Reject a value that is empty once surrounding whitespace is removed.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject a negative monetary amount.
pub fn require_non_negative(field: &str, value: Amount) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    Ok(())
}

/// Reject a zero or negative monetary amount.
pub fn require_positive(field: &str, value: Amount) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than zero (got {value})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_empty() {
        assert!(require_non_empty("requester", "   ").is_err());
        assert!(require_non_empty("requester", "Budi").is_ok());
    }

    #[test]
    fn zero_is_non_negative_but_not_positive() {
        assert!(require_non_negative("amount", 0).is_ok());
        assert!(require_positive("amount", 0).is_err());
        assert!(require_non_negative("amount", -1).is_err());
    }

    #[test]
    fn message_names_the_field() {
        let err = require_non_empty("items", "").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: items is required");
    }
}

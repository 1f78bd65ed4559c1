//! # Validation Module
//!
//! Input validation for customer registration and entry forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation shell (out of scope)                            │
//! │  └── Immediate form feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service facade (Rust)                                        │
//! │  └── THIS MODULE: required fields, lengths, formats                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL constraints, indexes                                     │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CROP_LEN, MAX_NAME_LEN, MOBILE_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_NAME_LEN`] characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_text_field("name", name, MAX_NAME_LEN)
}

/// Validates a village name. Same shape of rules as customer names.
pub fn validate_village(village: &str) -> ValidationResult<()> {
    validate_text_field("village", village, MAX_NAME_LEN)
}

/// Validates a crop type label.
pub fn validate_crop_type(crop: &str) -> ValidationResult<()> {
    validate_text_field("crop type", crop, MAX_CROP_LEN)
}

/// Validates a mobile number.
///
/// ## Rules
/// - Must not be empty
/// - Optional leading `+` (country code form)
/// - Digits only otherwise, 10 to 13 of them
///
/// ## Example
/// ```rust
/// use jalbook_core::validation::validate_mobile;
///
/// assert!(validate_mobile("9876543210").is_ok());
/// assert!(validate_mobile("+919876543210").is_ok());
/// assert!(validate_mobile("98765").is_err());
/// assert!(validate_mobile("98765-43210").is_err());
/// ```
pub fn validate_mobile(mobile: &str) -> ValidationResult<()> {
    let mobile = mobile.trim();

    if mobile.is_empty() {
        return Err(ValidationError::Required {
            field: "mobile".to_string(),
        });
    }

    let digits = mobile.strip_prefix('+').unwrap_or(mobile);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobile".to_string(),
            reason: "must contain only digits, with an optional leading +".to_string(),
        });
    }

    if !MOBILE_DIGITS.contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobile".to_string(),
            reason: format!(
                "must have between {} and {} digits",
                MOBILE_DIGITS.start(),
                MOBILE_DIGITS.end()
            ),
        });
    }

    Ok(())
}

/// Shared required-and-bounded check for free-text fields.
fn validate_text_field(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_name_required() {
        assert!(validate_customer_name("Ramesh Patil").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
    }

    #[test]
    fn test_customer_name_length_cap() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_customer_name(&long).is_err());
        let ok = "x".repeat(MAX_NAME_LEN);
        assert!(validate_customer_name(&ok).is_ok());
    }

    #[test]
    fn test_mobile_formats() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+919876543210").is_ok());
        assert!(validate_mobile(" 9876543210 ").is_ok());

        assert!(validate_mobile("").is_err());
        assert!(validate_mobile("98765").is_err());
        assert!(validate_mobile("98765432109876").is_err());
        assert!(validate_mobile("98765-43210").is_err());
        assert!(validate_mobile("ramesh").is_err());
    }

    #[test]
    fn test_village_and_crop() {
        assert!(validate_village("Shirpur").is_ok());
        assert!(validate_village("").is_err());

        assert!(validate_crop_type("Rice").is_ok());
        assert!(validate_crop_type("").is_err());
        assert!(validate_crop_type(&"c".repeat(MAX_CROP_LEN + 1)).is_err());
    }
}

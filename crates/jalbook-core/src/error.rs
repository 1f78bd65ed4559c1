//! # Error Types
//!
//! Domain errors for jalbook-core.
//!
//! Two layers: [`ValidationError`] for input that never should have reached
//! the business logic (blank names, malformed mobile numbers), and
//! [`CoreError`] for domain rules proper (a session that ends before it
//! starts, a crop nobody priced, a payment of zero). Both are raised before
//! any storage access, so a caller seeing one knows nothing was written.
//!
//! The storage and service crates define their own error enums
//! (`DbError`, `ServiceError`) and convert upward; the flow is
//! `ValidationError → CoreError → DbError → ServiceError → caller`.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Domain rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Supply session whose end instant is not after its start. A zero or
    /// negative duration cannot be billed.
    #[error("supply end {end} must be after start {start}")]
    InvalidSupplyRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Crop with no configured rate and no default rate to fall back on.
    #[error("no hourly rate configured for crop '{crop}' and no default rate set")]
    UnknownRate { crop: String },

    /// Payment that is zero or negative. Recording it would corrupt
    /// `total_paid`, which only ever grows.
    #[error("payment must be a positive amount, got {amount}")]
    InvalidPaymentAmount { amount: Money },

    /// Input validation failure, carried through unchanged.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures, raised by the checks in
/// [`validation`](crate::validation) before any domain logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Required field missing or blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Field longer than the configured cap.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field present but malformed.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rate_message_names_the_crop() {
        let err = CoreError::UnknownRate {
            crop: "Turmeric".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no hourly rate configured for crop 'Turmeric' and no default rate set"
        );
    }

    #[test]
    fn test_payment_message_shows_the_amount() {
        let err = CoreError::InvalidPaymentAmount {
            amount: Money::from_rupees(-50),
        };
        assert_eq!(err.to_string(), "payment must be a positive amount, got -₹50");
    }

    #[test]
    fn test_validation_error_wraps_into_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "mobile".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "validation failed: mobile is required");
    }

    #[test]
    fn test_too_long_message_includes_the_cap() {
        let err = ValidationError::TooLong {
            field: "village".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "village must be at most 100 characters");
    }
}

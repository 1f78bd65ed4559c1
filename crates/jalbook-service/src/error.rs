//! # Service Error Type
//!
//! Unified error type for service operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in JalBook                                │
//! │                                                                         │
//! │  Shell call                     Rust backend                            │
//! │  ──────────                     ────────────                            │
//! │                                                                         │
//! │  service.record_payment(...)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ── CoreError::InvalidPaymentAmount ──┐              │
//! │         │                                               │              │
//! │         ▼                                               ▼              │
//! │  Database Error?  ──── DbError::NotFound ────────► ServiceError ──►    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────────►    │
//! │                                                                         │
//! │  The caller gets { code, message }: code for branching, message for    │
//! │  display. Nothing here is retried automatically.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use jalbook_core::CoreError;
use jalbook_db::DbError;

/// Error returned from service operations.
///
/// ## Serialization
/// A shell that serializes errors over an IPC or HTTP boundary sends:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: 7f3a..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Customer or entry not found (the whole operation was aborted)
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Domain rule violation (invalid session range, unknown crop rate)
    BusinessLogic,

    /// Payment amount rejected
    PaymentError,

    /// Storage operation failed
    DatabaseError,

    /// Export requested over an empty result set
    NoData,

    /// Passcode rejected by the access gate
    Unauthorized,

    /// Internal error
    Internal,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the empty-export error.
    pub fn no_data() -> Self {
        ServiceError::new(ErrorCode::NoData, "No entries match the selected filters")
    }

    /// Creates the rejected-passcode error.
    pub fn unauthorized() -> Self {
        ServiceError::new(ErrorCode::Unauthorized, "Incorrect passcode")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to service errors.
impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ServiceError::not_found(&entity, &id),
            DbError::UniqueViolation { field } => ServiceError::new(
                ErrorCode::ValidationError,
                format!("A record with the same {} already exists", field),
            ),
            DbError::ConnectionFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ServiceError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ServiceError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ServiceError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ServiceError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidSupplyRange { .. } => {
                ServiceError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::UnknownRate { .. } => {
                ServiceError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::InvalidPaymentAmount { .. } => {
                ServiceError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::Validation(e) => ServiceError::validation(e.to_string()),
        }
    }
}

impl From<jalbook_core::ValidationError> for ServiceError {
    fn from(err: jalbook_core::ValidationError) -> Self {
        ServiceError::validation(err.to_string())
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

// =============================================================================
// Unit Tests
// =============================================================================

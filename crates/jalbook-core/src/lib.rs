//! # jalbook-core: Pure Business Logic for JalBook
//!
//! This crate is the **heart** of JalBook. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        JalBook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation shell (out of scope)              │   │
//! │  │    Customer forms ──► Entry forms ──► Dashboard ──► Exports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    jalbook-service                              │   │
//! │  │    add_customer, add_entry, record_payment, export_entries      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ jalbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  charge   │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │ RateTable │  │   rules   │  │   │
//! │  │   │SupplyEntry│  │  (rupees) │  │ calculate │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    jalbook-db (Database Layer)                  │   │
//! │  │           SQLite stores, ledger engine, reporting               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, SupplyEntry)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`rates`] - Crop type to hourly rate schedule
//! - [`charge`] - Supply session charge calculation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are whole rupees (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use jalbook_core::charge::calculate;
//! use jalbook_core::rates::RateTable;
//!
//! let rates = RateTable::standard();
//! let start = Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2026, 6, 1, 8, 30, 0).unwrap();
//!
//! // 2.5 hours of Rice at 200/hr
//! let charge = calculate(start, end, "Rice", &rates).unwrap();
//! assert_eq!(charge.amount.rupees(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod charge;
pub mod error;
pub mod money;
pub mod rates;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use jalbook_core::Money` instead of
// `use jalbook_core::money::Money`

pub use charge::{calculate, Charge};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use rates::RateTable;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length accepted for customer names and village names.
///
/// ## Business Reason
/// Keeps form input and denormalized name snapshots bounded.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length accepted for a crop type label.
pub const MAX_CROP_LEN: usize = 50;

/// Accepted digit count range for mobile numbers (country code included).
pub const MOBILE_DIGITS: std::ops::RangeInclusive<usize> = 10..=13;

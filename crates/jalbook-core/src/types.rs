//! # Domain Types
//!
//! Core domain types used throughout JalBook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐              ┌──────────────────┐                │
//! │  │    Customer      │   1 ──── N   │   SupplyEntry    │                │
//! │  │  ──────────────  │◄─────────────│  ──────────────  │                │
//! │  │  id (UUID)       │              │  id (UUID)       │                │
//! │  │  name            │              │  customer_id     │                │
//! │  │  mobile          │              │  customer_name   │ (snapshot)     │
//! │  │  village         │              │  start_at/end_at │                │
//! │  │  total_paid      │              │  duration_hours  │                │
//! │  │  pending_amount  │              │  crop_type       │                │
//! │  └──────────────────┘              │  amount, is_paid │                │
//! │                                    └──────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `pending_amount` tracks the sum of the customer's unpaid entry amounts
//! and is maintained by the ledger engine, never set directly by callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A water-supply customer with aggregate balances.
///
/// Balance fields are owned by the ledger engine: `total_paid` only grows
/// when payments are recorded, `pending_amount` mirrors the unpaid ledger
/// and never goes negative. Profile fields (name, mobile, village) may be
/// edited directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Full name shown in listings and on exports.
    pub name: String,

    /// Contact mobile number.
    pub mobile: String,

    /// Village the customer's fields are in.
    pub village: String,

    /// Cumulative amount ever paid.
    pub total_paid: Money,

    /// Outstanding balance, kept >= 0.
    pub pending_amount: Money,

    /// When the customer was registered.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Supply Entry
// =============================================================================

/// One billable water-supply session for a customer.
///
/// ## Snapshot Pattern
/// `customer_name` is copied from the customer at entry creation. Renaming
/// a customer later does not rewrite history; old entries keep the name
/// under which they were billed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning customer.
    pub customer_id: String,

    /// Customer name at the time the entry was created.
    pub customer_name: String,

    /// When the water was turned on.
    pub start_at: DateTime<Utc>,

    /// When the water was turned off. Always after `start_at`; the session
    /// may cross a day boundary.
    pub end_at: DateTime<Utc>,

    /// Derived session length in fractional hours.
    pub duration_hours: f64,

    /// Crop the session was billed under.
    pub crop_type: String,

    /// Billed amount, computed once at creation.
    pub amount: Money,

    /// Whether a recorded payment has fully covered this entry. Entries are
    /// binary paid/unpaid; there is no partial-paid state.
    pub is_paid: bool,

    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl SupplyEntry {
    /// Display label for the paid flag, used in exports and tables.
    pub fn status_label(&self) -> &'static str {
        if self.is_paid {
            "Paid"
        } else {
            "Unpaid"
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

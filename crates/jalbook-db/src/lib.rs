//! # jalbook-db: Database Layer for JalBook
//!
//! This crate provides database access for the JalBook system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        JalBook Data Flow                                │
//! │                                                                         │
//! │  Service call (record_payment)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     jalbook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │ LedgerEngine │  │   │
//! │  │   │   (pool.rs)   │    │ (customer.rs) │    │ (ledger.rs)  │  │   │
//! │  │   │               │    │ (entry.rs)    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ point reads   │◄───│ atomic multi │  │   │
//! │  │   │ Migrations    │    │ listings      │    │ row updates  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │           customers + supply_entries (WAL mode)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Customer account store and ledger entry store
//! - [`ledger`] - Balance reconciliation engine (the atomic multi-row ops)
//! - [`reports`] - Read-side aggregation with row-scan fallback
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jalbook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/jalbook.db")).await?;
//!
//! let customer = db.customers().create("Ramesh Patil", "9876543210", "Shirpur").await?;
//! let entry = db.ledger().add_entry(&customer.id, start, end, "Rice", charge).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod reports;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use ledger::LedgerEngine;
pub use pool::{Database, DbConfig};
pub use reports::{ReportRepository, SupplyTotals};
pub use repository::customer::CustomerRepository;
pub use repository::entry::{EntryFilter, EntryRepository};

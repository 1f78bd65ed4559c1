//! # jalbook-service: Operation Facade for JalBook
//!
//! The layer a presentation shell calls. Everything a form, table, or
//! dashboard needs is one method on [`SupplyService`]; everything it may
//! receive on failure is one [`ServiceError`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation shell (forms, tables, dashboard - out of scope)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AccessGate ── shared passcode ──► SupplyService (THIS CRATE)          │
//! │                                         │                               │
//! │                 ┌───────────────────────┼──────────────────────┐        │
//! │                 ▼                       ▼                      ▼        │
//! │          jalbook-core            jalbook-db             export (CSV)    │
//! │          charge math             ledger engine,                         │
//! │          validation              stores, reports                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`service`] - [`SupplyService`]: the operation set
//! - [`export`] - CSV rendering for filtered entry reports
//! - [`gate`] - [`AccessGate`]: capability wrapper guarding the service
//! - [`error`] - [`ServiceError`] with machine-readable codes

pub mod error;
pub mod export;
pub mod gate;
pub mod service;

pub use error::{ErrorCode, ServiceError};
pub use gate::AccessGate;
pub use service::{DashboardData, ReportFilter, SupplyService};

//! # Supply Entry Repository
//!
//! Database operations for the per-session supply ledger.
//!
//! ## Query Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_recent            all entries, newest session first              │
//! │  list_for_customer      one customer's history, newest first           │
//! │  list_unpaid_oldest     unpaid entries, OLDEST first (payment walk)    │
//! │  list_filtered          customer and/or date window (reports, export)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This store is structural only: it never touches customer balances.
//! Creating or deleting entries in a way that keeps balances consistent is
//! the job of the [`LedgerEngine`](crate::ledger::LedgerEngine).

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::warn;

use crate::error::DbResult;
use crate::repository::{fmt_ts, parse_ts};
use jalbook_core::{Money, SupplyEntry};

/// Filter for report and export queries. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Restrict to one customer's entries.
    pub customer_id: Option<String>,
    /// Sessions starting at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Sessions starting at or before this instant.
    pub to: Option<DateTime<Utc>>,
}

/// Repository for supply entry database operations.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    pool: SqlitePool,
}

pub(crate) const ENTRY_COLUMNS: &str =
    "id, customer_id, customer_name, start_at, end_at, \
     duration_hours, crop_type, amount, is_paid, created_at";

impl EntryRepository {
    /// Creates a new EntryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EntryRepository { pool }
    }

    /// Inserts a fully-built entry row.
    ///
    /// No balance bookkeeping happens here; use the ledger engine for the
    /// normal add-entry path.
    pub async fn insert(&self, entry: &SupplyEntry) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO supply_entries (
                id, customer_id, customer_name,
                start_at, end_at, duration_hours,
                crop_type, amount, is_paid, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.customer_id)
        .bind(&entry.customer_name)
        .bind(fmt_ts(entry.start_at))
        .bind(fmt_ts(entry.end_at))
        .bind(entry.duration_hours)
        .bind(&entry.crop_type)
        .bind(entry.amount.rupees())
        .bind(entry.is_paid)
        .bind(fmt_ts(entry.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an entry by ID. An undecodable row reads as absent.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SupplyEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM supply_entries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(read_entry))
    }

    /// Lists the most recent entries across all customers, newest session
    /// first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SupplyEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM supply_entries ORDER BY start_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(read_entry).collect())
    }

    /// Lists one customer's entries, newest session first (history view).
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<SupplyEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM supply_entries \
             WHERE customer_id = ?1 ORDER BY start_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(read_entry).collect())
    }

    /// Lists a customer's unpaid entries, oldest session first.
    ///
    /// This is the order payments are applied in: the earliest outstanding
    /// session settles first.
    pub async fn list_unpaid_oldest(&self, customer_id: &str) -> DbResult<Vec<SupplyEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM supply_entries \
             WHERE customer_id = ?1 AND is_paid = 0 ORDER BY start_at ASC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(read_entry).collect())
    }

    /// Lists entries matching a customer/date-window filter, newest session
    /// first. Used by filtered reports and CSV export.
    pub async fn list_filtered(&self, filter: &EntryFilter) -> DbResult<Vec<SupplyEntry>> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM supply_entries"));
        push_entry_filter(&mut qb, filter);
        qb.push(" ORDER BY start_at DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;

        Ok(rows.iter().filter_map(read_entry).collect())
    }

    /// Counts entry records (used by the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM supply_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Appends the WHERE clause for an [`EntryFilter`].
///
/// Shared between the listing query and the report aggregation paths so a
/// SUM and its row-scan fallback always see the same rows.
pub(crate) fn push_entry_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &EntryFilter) {
    qb.push(" WHERE 1=1");
    if let Some(customer_id) = &filter.customer_id {
        qb.push(" AND customer_id = ");
        qb.push_bind(customer_id.clone());
    }
    if let Some(from) = filter.from {
        qb.push(" AND start_at >= ");
        qb.push_bind(fmt_ts(from));
    }
    if let Some(to) = filter.to {
        qb.push(" AND start_at <= ");
        qb.push_bind(fmt_ts(to));
    }
}

/// Decodes an entry row, dropping corrupt rows with a warning.
pub(crate) fn read_entry(row: &SqliteRow) -> Option<SupplyEntry> {
    match try_read_entry(row) {
        Ok(entry) => Some(entry),
        Err(reason) => {
            warn!(%reason, "Dropping corrupt supply entry row from result set");
            None
        }
    }
}

fn try_read_entry(row: &SqliteRow) -> Result<SupplyEntry, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;

    let start_raw: String = row.try_get("start_at").map_err(|e| e.to_string())?;
    let end_raw: String = row.try_get("end_at").map_err(|e| e.to_string())?;
    let created_raw: String = row.try_get("created_at").map_err(|e| e.to_string())?;

    let start_at = parse_ts(&start_raw).ok_or_else(|| format!("bad start_at '{start_raw}'"))?;
    let end_at = parse_ts(&end_raw).ok_or_else(|| format!("bad end_at '{end_raw}'"))?;
    let created_at =
        parse_ts(&created_raw).ok_or_else(|| format!("bad created_at '{created_raw}'"))?;

    Ok(SupplyEntry {
        id,
        customer_id: row.try_get("customer_id").map_err(|e| e.to_string())?,
        customer_name: row.try_get("customer_name").map_err(|e| e.to_string())?,
        start_at,
        end_at,
        duration_hours: row.try_get("duration_hours").map_err(|e| e.to_string())?,
        crop_type: row.try_get("crop_type").map_err(|e| e.to_string())?,
        amount: Money::from_rupees(row.try_get("amount").map_err(|e| e.to_string())?),
        is_paid: row.try_get("is_paid").map_err(|e| e.to_string())?,
        created_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Report Aggregation
//!
//! Read-only rollups over the two stores: supplied hours and revenue for a
//! filtered window, total outstanding balance across all customers, and the
//! recent-activity feed.
//!
//! ## Fallback Summation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  totals(filter)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQL SUM(...) with the filter's WHERE clause                            │
//! │       │                                                                 │
//! │       ├── Ok ────────────────────────────► SupplyTotals                │
//! │       │                                                                 │
//! │       └── Err ──► warn! ──► fetch matching rows, sum in Rust ──► same  │
//! │                             (identical WHERE clause)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Both paths share the filter-building code, so they see the same rows;
//! callers cannot tell which path produced the number.
//!
//! Reads here are unsynchronized with ledger writes. A dashboard refresh
//! racing a payment sees the last committed state, which is fine for
//! informational reporting.

use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::warn;

use crate::error::DbResult;
use crate::repository::entry::{push_entry_filter, read_entry, EntryFilter, ENTRY_COLUMNS};
use jalbook_core::{Money, SupplyEntry};

/// Aggregate over a filtered set of supply entries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SupplyTotals {
    /// Total supplied hours.
    pub hours: f64,
    /// Total billed amount.
    pub revenue: Money,
}

/// Repository for report aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sums supplied hours and revenue over the filtered entries.
    ///
    /// Prefers the SQL aggregate; if that fails, falls back to scanning the
    /// matching rows and summing them here. Same filter, same result.
    pub async fn totals(&self, filter: &EntryFilter) -> DbResult<SupplyTotals> {
        match self.totals_aggregate(filter).await {
            Ok(totals) => Ok(totals),
            Err(err) => {
                warn!(error = %err, "Aggregate totals query failed, falling back to row scan");
                self.totals_scan(filter).await
            }
        }
    }

    /// Total outstanding balance across all customers.
    ///
    /// Same aggregate-then-scan structure as [`totals`](Self::totals).
    pub async fn total_pending(&self) -> DbResult<Money> {
        match self.pending_aggregate().await {
            Ok(pending) => Ok(pending),
            Err(err) => {
                warn!(error = %err, "Aggregate pending query failed, falling back to row scan");
                self.pending_scan().await
            }
        }
    }

    /// The last `limit` entries by creation time, newest first.
    pub async fn recent_activity(&self, limit: u32) -> DbResult<Vec<SupplyEntry>> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM supply_entries ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(read_entry).collect())
    }

    async fn totals_aggregate(&self, filter: &EntryFilter) -> DbResult<SupplyTotals> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT SUM(duration_hours) AS hours, SUM(amount) AS revenue FROM supply_entries",
        );
        push_entry_filter(&mut qb, filter);

        let row = qb.build().fetch_one(&self.pool).await?;

        // SUM over zero rows is NULL
        let hours: Option<f64> = row.try_get("hours")?;
        let revenue: Option<i64> = row.try_get("revenue")?;

        Ok(SupplyTotals {
            hours: hours.unwrap_or(0.0),
            revenue: Money::from_rupees(revenue.unwrap_or(0)),
        })
    }

    async fn totals_scan(&self, filter: &EntryFilter) -> DbResult<SupplyTotals> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM supply_entries"));
        push_entry_filter(&mut qb, filter);

        let rows = qb.build().fetch_all(&self.pool).await?;

        let mut totals = SupplyTotals::default();
        for entry in rows.iter().filter_map(read_entry) {
            totals.hours += entry.duration_hours;
            totals.revenue += entry.amount;
        }

        Ok(totals)
    }

    async fn pending_aggregate(&self) -> DbResult<Money> {
        let pending: Option<i64> =
            sqlx::query_scalar("SELECT SUM(pending_amount) FROM customers")
                .fetch_one(&self.pool)
                .await?;

        Ok(Money::from_rupees(pending.unwrap_or(0)))
    }

    async fn pending_scan(&self) -> DbResult<Money> {
        let rows = sqlx::query("SELECT pending_amount FROM customers")
            .fetch_all(&self.pool)
            .await?;

        let mut total = Money::zero();
        for row in &rows {
            match row.try_get::<i64, _>("pending_amount") {
                Ok(pending) => total += Money::from_rupees(pending),
                Err(err) => warn!(error = %err, "Skipping unreadable pending_amount"),
            }
        }

        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{TimeZone, Utc};
    use jalbook_core::SupplyEntry;
    use uuid::Uuid;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn insert_entry(db: &Database, customer_id: &str, day: u32, hours: f64, amount: i64) {
        let start = Utc.with_ymd_and_hms(2026, 6, day, 6, 0, 0).unwrap();
        let entry = SupplyEntry {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            customer_name: "Ramesh Patil".to_string(),
            start_at: start,
            end_at: start + chrono::Duration::minutes((hours * 60.0) as i64),
            duration_hours: hours,
            crop_type: "Rice".to_string(),
            amount: Money::from_rupees(amount),
            is_paid: false,
            created_at: start,
        };
        db.entries().insert(&entry).await.unwrap();
    }

    #[tokio::test]
    async fn test_totals_over_empty_set_is_zero() {
        let db = test_db().await;
        let totals = db.reports().totals(&EntryFilter::default()).await.unwrap();
        assert_eq!(totals.hours, 0.0);
        assert!(totals.revenue.is_zero());
    }

    #[tokio::test]
    async fn test_totals_with_date_window() {
        let db = test_db().await;
        insert_entry(&db, "c1", 1, 2.0, 400).await;
        insert_entry(&db, "c1", 10, 3.0, 600).await;
        insert_entry(&db, "c2", 10, 1.0, 200).await;
        insert_entry(&db, "c1", 20, 5.0, 1000).await;

        let filter = EntryFilter {
            customer_id: None,
            from: Some(Utc.with_ymd_and_hms(2026, 6, 5, 0, 0, 0).unwrap()),
            to: Some(Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap()),
        };

        let totals = db.reports().totals(&filter).await.unwrap();
        assert_eq!(totals.hours, 4.0);
        assert_eq!(totals.revenue.rupees(), 800);
    }

    #[tokio::test]
    async fn test_scan_matches_aggregate() {
        let db = test_db().await;
        insert_entry(&db, "c1", 1, 2.0, 400).await;
        insert_entry(&db, "c1", 2, 2.5, 500).await;
        insert_entry(&db, "c2", 3, 1.0, 200).await;

        let reports = db.reports();
        let filter = EntryFilter {
            customer_id: Some("c1".to_string()),
            ..Default::default()
        };

        let aggregate = reports.totals_aggregate(&filter).await.unwrap();
        let scan = reports.totals_scan(&filter).await.unwrap();

        assert_eq!(aggregate.hours, scan.hours);
        assert_eq!(aggregate.revenue, scan.revenue);
        assert_eq!(aggregate.revenue.rupees(), 900);
    }

    #[tokio::test]
    async fn test_total_pending_sums_customers() {
        let db = test_db().await;
        let repo = db.customers();

        let a = repo.create("A", "9876543210", "X").await.unwrap();
        let b = repo.create("B", "9876543211", "Y").await.unwrap();

        sqlx::query("UPDATE customers SET pending_amount = 700 WHERE id = ?1")
            .bind(&a.id)
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query("UPDATE customers SET pending_amount = 300 WHERE id = ?1")
            .bind(&b.id)
            .execute(db.pool())
            .await
            .unwrap();

        let reports = db.reports();
        assert_eq!(reports.total_pending().await.unwrap().rupees(), 1000);
        assert_eq!(reports.pending_scan().await.unwrap().rupees(), 1000);
    }

    #[tokio::test]
    async fn test_recent_activity_is_by_creation_time() {
        let db = test_db().await;
        // created_at tracks the start here, so day order is creation order
        insert_entry(&db, "c1", 1, 2.0, 400).await;
        insert_entry(&db, "c1", 3, 2.0, 600).await;
        insert_entry(&db, "c1", 2, 2.0, 500).await;

        let recent = db.reports().recent_activity(2).await.unwrap();
        let amounts: Vec<i64> = recent.iter().map(|e| e.amount.rupees()).collect();
        assert_eq!(amounts, vec![600, 500]);
    }
}

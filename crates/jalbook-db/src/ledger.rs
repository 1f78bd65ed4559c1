//! # Balance Reconciliation Engine
//!
//! Keeps each customer's aggregate balances (`total_paid`, `pending_amount`)
//! synchronized with the per-session supply ledger, through four atomic
//! operations.
//!
//! ## The Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One SQLite transaction each                         │
//! │                                                                         │
//! │  add_entry        INSERT entry (unpaid)                                │
//! │                   UPDATE customer  pending += amount                   │
//! │                                                                         │
//! │  delete_entry     DELETE entry                                         │
//! │                   UPDATE customer  pending = max(0, pending - amount)  │
//! │                   (only if the entry was unpaid)                       │
//! │                                                                         │
//! │  record_payment   UPDATE customer  total_paid += paid                  │
//! │                                    pending = max(0, pending - paid)    │
//! │                   UPDATE entries   oldest-first, mark fully covered    │
//! │                                    entries paid, stop at first one     │
//! │                                    the remainder can't cover           │
//! │                                                                         │
//! │  delete_customer  DELETE all entries, DELETE customer                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Rules
//! - Readers never observe a half-applied operation: every op commits all
//!   its rows together or none of them.
//! - `pending_amount` never goes negative. Deductions clamp at zero.
//! - Entries are binary paid/unpaid. A payment that only partially covers
//!   the oldest outstanding entry reduces the aggregate balance but leaves
//!   that entry (and everything newer) flagged unpaid. Until the rest of
//!   that entry is paid, the aggregate runs below the sum of unpaid entry
//!   amounts. This is the intended bookkeeping rule, not drift: the
//!   customer document is the authoritative balance, the per-entry flags
//!   are settlement annotations.
//!
//! SQLite serializes writers, so two concurrent payments against the same
//! customer cannot interleave their read-modify-write cycles.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::fmt_ts;
use jalbook_core::{Charge, Money, SupplyEntry};

/// The reconciliation engine. All customer balance mutations go through
/// here; repositories only do structural reads and writes.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    pool: SqlitePool,
}

impl LedgerEngine {
    /// Creates a new LedgerEngine.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerEngine { pool }
    }

    /// Records a new supply session and adds its amount to the customer's
    /// pending balance.
    ///
    /// The entry always starts unpaid; payments are the only path that
    /// marks entries paid. The customer's name is snapshotted onto the
    /// entry as it stands at creation time.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the customer does not exist. Nothing is
    /// written in that case.
    pub async fn add_entry(
        &self,
        customer_id: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        crop_type: &str,
        charge: Charge,
    ) -> DbResult<SupplyEntry> {
        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query("SELECT name FROM customers WHERE id = ?1")
            .bind(customer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", customer_id))?;
        let customer_name: String = customer.try_get("name")?;

        let entry = SupplyEntry {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            customer_name,
            start_at,
            end_at,
            duration_hours: charge.duration_hours,
            crop_type: crop_type.trim().to_string(),
            amount: charge.amount,
            is_paid: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO supply_entries (
                id, customer_id, customer_name,
                start_at, end_at, duration_hours,
                crop_type, amount, is_paid, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9)
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
        .bind(fmt_ts(entry.created_at))
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE customers SET pending_amount = pending_amount + ?2 WHERE id = ?1")
            .bind(customer_id)
            .bind(entry.amount.rupees())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            entry_id = %entry.id,
            customer_id = %entry.customer_id,
            amount = %entry.amount,
            crop = %entry.crop_type,
            "Supply entry added"
        );

        Ok(entry)
    }

    /// Deletes a supply entry, deducting its amount from the customer's
    /// pending balance if the entry was still unpaid.
    ///
    /// Idempotent: deleting an entry that no longer exists is a successful
    /// no-op. If the owning customer record is missing, the delete still
    /// commits and the mismatch is logged rather than failing the whole
    /// operation.
    pub async fn delete_entry(&self, entry_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        // Re-read inside the transaction; a stale caller may hold an entry
        // that another delete already removed.
        let row = sqlx::query(
            "SELECT customer_id, amount, is_paid FROM supply_entries WHERE id = ?1",
        )
        .bind(entry_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            debug!(entry_id, "Entry already deleted, nothing to do");
            return Ok(());
        };

        let customer_id: String = row.try_get("customer_id")?;
        let amount: i64 = row.try_get("amount")?;
        let is_paid: bool = row.try_get("is_paid")?;

        sqlx::query("DELETE FROM supply_entries WHERE id = ?1")
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        if !is_paid {
            let result = sqlx::query(
                "UPDATE customers SET pending_amount = MAX(pending_amount - ?2, 0) WHERE id = ?1",
            )
            .bind(&customer_id)
            .bind(amount)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(
                    entry_id,
                    customer_id = %customer_id,
                    "Owning customer missing while deleting entry; balance not adjusted"
                );
            }
        }

        tx.commit().await?;

        info!(entry_id, customer_id = %customer_id, amount, "Supply entry deleted");
        Ok(())
    }

    /// Records a payment against a customer.
    ///
    /// The aggregate update is unconditional: `total_paid` grows by the
    /// full payment and `pending_amount` shrinks by it, clamped at zero.
    /// Entry flags are then settled oldest-session-first. An entry is only
    /// flagged paid when the remaining payment covers it entirely; the walk
    /// stops at the first entry it cannot cover. Excess beyond the total
    /// outstanding is absorbed, not rejected.
    ///
    /// Callers are expected to have validated `amount > 0`.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the customer does not exist. Nothing is
    /// written in that case.
    pub async fn record_payment(&self, customer_id: &str, amount: Money) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query(
            "SELECT total_paid, pending_amount FROM customers WHERE id = ?1",
        )
        .bind(customer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", customer_id))?;

        let total_paid = Money::from_rupees(customer.try_get("total_paid")?);
        let pending = Money::from_rupees(customer.try_get("pending_amount")?);

        let new_total_paid = total_paid + amount;
        let new_pending = pending.deduct_clamped(amount);

        // Settle entry flags oldest-first from the same snapshot the
        // balance arithmetic runs on.
        let unpaid = sqlx::query(
            "SELECT id, amount FROM supply_entries \
             WHERE customer_id = ?1 AND is_paid = 0 ORDER BY start_at ASC",
        )
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut remaining = amount.rupees();
        let mut settled: Vec<String> = Vec::new();

        for row in &unpaid {
            if remaining <= 0 {
                break;
            }

            let entry_amount: i64 = row.try_get("amount")?;
            if entry_amount <= 0 {
                // A zero-amount entry can't absorb payment; skip it rather
                // than stall the walk.
                continue;
            }

            if remaining >= entry_amount {
                settled.push(row.try_get("id")?);
                remaining -= entry_amount;
            } else {
                // Entries have no partial-paid state. The remainder stays
                // in the aggregate balance only.
                break;
            }
        }

        for entry_id in &settled {
            sqlx::query("UPDATE supply_entries SET is_paid = 1 WHERE id = ?1")
                .bind(entry_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE customers SET total_paid = ?2, pending_amount = ?3 WHERE id = ?1")
            .bind(customer_id)
            .bind(new_total_paid.rupees())
            .bind(new_pending.rupees())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            customer_id,
            amount = %amount,
            entries_settled = settled.len(),
            new_pending = %new_pending,
            "Payment recorded"
        );

        Ok(())
    }

    /// Deletes a customer and every entry referencing it, in one
    /// transaction. No-op success if the customer is already absent.
    pub async fn delete_customer(&self, customer_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let entries = sqlx::query("DELETE FROM supply_entries WHERE customer_id = ?1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        let customer = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(customer_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if customer.rows_affected() == 0 {
            debug!(customer_id, "Customer already absent, nothing to do");
        } else {
            info!(
                customer_id,
                entries_removed = entries.rows_affected(),
                "Customer deleted with entries"
            );
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

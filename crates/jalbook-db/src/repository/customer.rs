//! # Customer Repository
//!
//! Database operations for customer accounts.
//!
//! ## Ownership Boundary
//! This store handles identity and profile data. The balance columns
//! (`total_paid`, `pending_amount`) are written only by the
//! [`LedgerEngine`](crate::ledger::LedgerEngine); nothing here exposes a
//! path that sets them directly, beyond zero-initialization on create.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{fmt_ts, parse_ts};
use jalbook_core::{Customer, Money};

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// let customer = repo.create("Ramesh Patil", "9876543210", "Shirpur").await?;
/// let all = repo.list_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates a new customer with zeroed balances.
    ///
    /// ## Returns
    /// The created customer with its generated ID.
    pub async fn create(&self, name: &str, mobile: &str, village: &str) -> DbResult<Customer> {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            mobile: mobile.trim().to_string(),
            village: village.trim().to_string(),
            total_paid: Money::zero(),
            pending_amount: Money::zero(),
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, name = %customer.name, "Creating customer");

        self.insert(&customer).await?;
        Ok(customer)
    }

    /// Inserts a fully-built customer row (used by create and by tests).
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, mobile, village,
                total_paid, pending_amount, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.village)
        .bind(customer.total_paid.rupees())
        .bind(customer.pending_amount.rupees())
        .bind(fmt_ts(customer.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a customer by ID.
    ///
    /// An undecodable row is reported as absent, per the read-repair policy.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, mobile, village, total_paid, pending_amount, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(read_customer))
    }

    /// Lists all customers ordered by name (case-insensitive).
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, mobile, village, total_paid, pending_amount, created_at
            FROM customers
            ORDER BY name COLLATE NOCASE
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(read_customer).collect())
    }

    /// Updates profile fields. Any argument left as `None` keeps its
    /// current value. Balance fields are not reachable from this path.
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        mobile: Option<&str>,
        village: Option<&str>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name = COALESCE(?2, name),
                mobile = COALESCE(?3, mobile),
                village = COALESCE(?4, village)
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name.map(str::trim))
        .bind(mobile.map(str::trim))
        .bind(village.map(str::trim))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Counts customer records (used by the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Decodes a customer row, dropping corrupt rows with a warning.
fn read_customer(row: &SqliteRow) -> Option<Customer> {
    match try_read_customer(row) {
        Ok(customer) => Some(customer),
        Err(reason) => {
            warn!(%reason, "Dropping corrupt customer row from result set");
            None
        }
    }
}

fn try_read_customer(row: &SqliteRow) -> Result<Customer, String> {
    let id: String = row.try_get("id").map_err(|e| e.to_string())?;
    let created_raw: String = row.try_get("created_at").map_err(|e| e.to_string())?;
    let created_at =
        parse_ts(&created_raw).ok_or_else(|| format!("bad created_at '{created_raw}'"))?;

    Ok(Customer {
        id,
        name: row.try_get("name").map_err(|e| e.to_string())?,
        mobile: row.try_get("mobile").map_err(|e| e.to_string())?,
        village: row.try_get("village").map_err(|e| e.to_string())?,
        total_paid: Money::from_rupees(row.try_get("total_paid").map_err(|e| e.to_string())?),
        pending_amount: Money::from_rupees(
            row.try_get("pending_amount").map_err(|e| e.to_string())?,
        ),
        created_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo
            .create("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        let loaded = repo.get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ramesh Patil");
        assert_eq!(loaded.village, "Shirpur");
        assert!(loaded.total_paid.is_zero());
        assert!(loaded.pending_amount.is_zero());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let db = test_db().await;
        assert!(db.customers().get_by_id("no-such-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = test_db().await;
        let repo = db.customers();

        repo.create("suresh", "9876543211", "Akoli").await.unwrap();
        repo.create("Anita", "9876543212", "Akoli").await.unwrap();
        repo.create("Mahesh", "9876543213", "Akoli").await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Anita", "Mahesh", "suresh"]);
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let db = test_db().await;
        let repo = db.customers();

        let customer = repo
            .create("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        repo.update_profile(&customer.id, None, Some("9000000000"), None)
            .await
            .unwrap();

        let loaded = repo.get_by_id(&customer.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ramesh Patil");
        assert_eq!(loaded.mobile, "9000000000");
        assert_eq!(loaded.village, "Shirpur");
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let db = test_db().await;
        let err = db
            .customers()
            .update_profile("ghost", Some("X"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_dropped_from_list() {
        let db = test_db().await;
        let repo = db.customers();

        repo.create("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        // Sneak in a row with an unparseable created_at
        sqlx::query(
            "INSERT INTO customers (id, name, mobile, village, total_paid, pending_amount, created_at)
             VALUES ('bad', 'Broken', '9', 'X', 0, 0, 'garbage')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ramesh Patil");

        // Point lookup of the corrupt row reads as absent, not as an error
        assert!(repo.get_by_id("bad").await.unwrap().is_none());
    }
}

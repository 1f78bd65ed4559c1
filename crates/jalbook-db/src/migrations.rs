//! # Database Migrations
//!
//! Schema migrations embedded into the binary from `migrations/sqlite/` by
//! [`sqlx::migrate!`]. On startup the migrator checks the
//! `_sqlx_migrations` bookkeeping table and applies whatever is pending,
//! one transaction per migration, in filename order.
//!
//! Migration files are append-only: fixing a shipped migration means
//! writing a new `NNN_*.sql` on top of it, never editing the old file
//! (the migrator checksums applied files and refuses to start on a
//! mismatch).

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies pending migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(
        embedded = MIGRATOR.migrations.len(),
        "Schema migrations up to date"
    );
    Ok(())
}

/// Reports `(embedded, applied)` migration counts, for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((MIGRATOR.migrations.len(), applied as usize))
}

//! # Database Pool Management
//!
//! Opens the SQLite database and hands out the repositories and the ledger
//! engine that run against it.
//!
//! ## SQLite Setup
//! The database is opened in WAL journal mode with foreign keys on and a
//! short busy timeout. WAL matters here: dashboard and report reads run
//! unsynchronized with ledger writes, and WAL lets them read the last
//! committed state while a balance mutation is mid-transaction. SQLite
//! still serializes the writers themselves, which is what the ledger
//! engine's read-modify-write cycles rely on.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::ledger::LedgerEngine;
use crate::migrations;
use crate::reports::ReportRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::entry::EntryRepository;

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration, built up with chained setters.
///
/// The defaults suit a single-operator bookkeeping app: a small pool, a
/// generous connect timeout, migrations applied on open.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./data/jalbook.db").max_connections(8);
/// let db = Database::new(config).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file. Created if missing.
    pub database_path: PathBuf,

    /// Upper bound on pooled connections.
    pub max_connections: u32,

    /// Connections kept alive when idle.
    pub min_connections: u32,

    /// How long an acquire may wait for a free connection.
    pub connect_timeout: Duration,

    /// Idle time before a pooled connection is closed.
    pub idle_timeout: Duration,

    /// Apply pending migrations as part of [`Database::new`].
    pub run_migrations: bool,
}

impl DbConfig {
    /// Configuration for the database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the upper bound on pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets how many connections stay alive when idle.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether [`Database::new`] applies pending migrations.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Configuration for an isolated in-memory database.
    ///
    /// The pool is pinned to a single connection: each SQLite `:memory:`
    /// connection is its own database, so a second connection would see
    /// empty tables. Tests get a fresh schema per call.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    /// Translates the config into sqlx connect options.
    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        // sqlite://<path>?mode=rwc opens read-write and creates the file
        let url = format!("sqlite://{}?mode=rwc", self.database_path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            // NORMAL is durable enough under WAL; a crash can lose the last
            // transaction but never corrupts the file
            .synchronous(SqliteSynchronous::Normal)
            // off by default in SQLite for backwards compatibility
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database handle.
///
/// Cheap to clone. The accessors hand out lightweight wrappers over the
/// shared pool; nothing holds a connection between calls.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./jalbook.db")).await?;
///
/// let customers = db.customers().list_all().await?;
/// db.ledger().record_payment(&customer_id, Money::from_rupees(400)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if necessary) the configured database, builds the
    /// pool, and applies pending migrations unless the config opts out.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening SQLite database"
        );

        let options = config.connect_options()?;
        debug!(busy_timeout = ?BUSY_TIMEOUT, "Connect options built");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        info!(max_connections = config.max_connections, "Database ready");
        Ok(db)
    }

    /// Applies pending migrations. Called from [`Database::new`] unless the
    /// config disables it.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The raw connection pool, for queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the customer account store.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    /// Returns the ledger entry store.
    pub fn entries(&self) -> EntryRepository {
        EntryRepository::new(self.pool.clone())
    }

    /// Returns the balance reconciliation engine.
    pub fn ledger(&self) -> LedgerEngine {
        LedgerEngine::new(self.pool.clone())
    }

    /// Returns the report aggregation repository.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail after this.
    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// Whether the database still answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_migrations_applied() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert!(total >= 1);
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }
}

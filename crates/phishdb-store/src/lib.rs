//! Persistence store for the threat corpus.
//!
//! The corpus lives in two synchronized representations: a SQLite table for
//! aggregate/search queries and a flat CSV snapshot for portability. Both
//! are replaced atomically on publish — readers only ever observe a fully
//! published version.

mod corpus;
mod queries;
mod snapshot;

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

pub use queries::{AggregateColumn, AggregateRow, SearchColumn, SearchMode};

// Path relative to crates/phishdb-store/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("snapshot I/O error: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("snapshot encoding error: {0}")]
    SnapshotCsv(#[from] csv::Error),

    #[error("stored corpus names an unknown feed source: {0}")]
    UnknownSource(String),
}

/// Owner of the persisted corpus.
///
/// All reads go through this object; writes happen only via
/// [`Store::publish`], which the refresh pipeline serializes to a single
/// writer. WAL journaling keeps readers unblocked while a publish commits.
pub struct Store {
    pool: SqlitePool,
    snapshot_path: PathBuf,
}

impl Store {
    /// Open (or create) the store and run pending migrations.
    ///
    /// A missing database file is a cold start, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    pub async fn connect(database_path: &Path, snapshot_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        Ok(Self {
            pool,
            snapshot_path: snapshot_path.to_path_buf(),
        })
    }

    /// Send a `SELECT 1` to verify the pool has a live connection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlx`] if the query fails.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}

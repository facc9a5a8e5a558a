//! Corpus publish and load operations.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use phishdb_core::{FeedSource, ThreatRecord};

use crate::{snapshot, Store, StoreError};

/// Staging-table schema. Must stay in sync with `migrations/0001_create_corpus.sql`.
const CREATE_STAGING_TABLE: &str = "CREATE TABLE corpus_staging (
    url    TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    date   TEXT,
    notes  TEXT NOT NULL DEFAULT '',
    target TEXT NOT NULL,
    domain TEXT NOT NULL
)";

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_corpus_target ON corpus (target)",
    "CREATE INDEX IF NOT EXISTS idx_corpus_source ON corpus (source)",
    "CREATE INDEX IF NOT EXISTS idx_corpus_domain ON corpus (domain)",
];

/// A row of the `corpus` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CorpusRow {
    pub url: String,
    pub source: String,
    pub date: Option<DateTime<Utc>>,
    pub notes: String,
    pub target: String,
    pub domain: String,
}

impl TryFrom<CorpusRow> for ThreatRecord {
    type Error = StoreError;

    fn try_from(row: CorpusRow) -> Result<Self, Self::Error> {
        let source = FeedSource::from_str(&row.source)
            .map_err(|e| StoreError::UnknownSource(e.0))?;
        Ok(ThreatRecord {
            url: row.url,
            source,
            date: row.date,
            notes: row.notes,
            target: row.target,
            domain: row.domain,
        })
    }
}

impl Store {
    /// Atomically replace both corpus representations with `corpus`.
    ///
    /// The table is rewritten through a staging table that is swapped in
    /// (drop + rename) inside a single transaction, and the snapshot is
    /// written to a temp file and renamed over the old one. A failure at any
    /// point leaves the previously published version authoritative — a
    /// partially written or truncated store is never visible.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on any write failure. The caller must treat
    /// this as fatal for the refresh cycle.
    pub async fn publish(&self, corpus: &[ThreatRecord]) -> Result<(), StoreError> {
        self.replace_table(corpus).await?;
        snapshot::write(&self.snapshot_path, corpus)?;
        tracing::info!(records = corpus.len(), "published corpus");
        Ok(())
    }

    async fn replace_table(&self, corpus: &[ThreatRecord]) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DROP TABLE IF EXISTS corpus_staging")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_STAGING_TABLE).execute(&mut *tx).await?;

        for record in corpus {
            sqlx::query(
                "INSERT INTO corpus_staging (url, source, date, notes, target, domain) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&record.url)
            .bind(record.source.as_str())
            .bind(record.date)
            .bind(&record.notes)
            .bind(&record.target)
            .bind(&record.domain)
            .execute(&mut *tx)
            .await?;
        }

        // The swap is invisible to readers until this transaction commits.
        sqlx::query("DROP TABLE IF EXISTS corpus")
            .execute(&mut *tx)
            .await?;
        sqlx::query("ALTER TABLE corpus_staging RENAME TO corpus")
            .execute(&mut *tx)
            .await?;
        for sql in CREATE_INDEXES {
            sqlx::query(sql).execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load the full corpus in publish order.
    ///
    /// An empty table (cold start after migration) yields an empty vec.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the table cannot be read or contains a
    /// source identifier this build does not know.
    pub async fn load_corpus(&self) -> Result<Vec<ThreatRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CorpusRow>(
            "SELECT url, source, date, notes, target, domain FROM corpus ORDER BY rowid",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(ThreatRecord::try_from).collect()
    }

    /// Recover a corpus from the flat CSV snapshot.
    ///
    /// Used as a fallback when the table representation is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot is missing or malformed.
    pub fn load_snapshot(&self) -> Result<Vec<ThreatRecord>, StoreError> {
        snapshot::read(&self.snapshot_path)
    }

    /// Number of records in the published corpus.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlx`] if the query fails.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM corpus")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}

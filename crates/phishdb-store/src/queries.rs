//! Read-side operations: aggregation and search.
//!
//! Pure reads, safe to run at any time — concurrent publishes are invisible
//! until they commit. Records with no date sort after dated ones in search
//! results; they still participate in group-by aggregation.

use phishdb_core::ThreatRecord;
use serde::{Deserialize, Serialize};

use crate::corpus::CorpusRow;
use crate::{Store, StoreError};

/// Columns the corpus can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateColumn {
    Target,
    Source,
    Domain,
}

impl AggregateColumn {
    fn as_sql(self) -> &'static str {
        match self {
            AggregateColumn::Target => "target",
            AggregateColumn::Source => "source",
            AggregateColumn::Domain => "domain",
        }
    }
}

impl std::str::FromStr for AggregateColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "target" => Ok(AggregateColumn::Target),
            "source" => Ok(AggregateColumn::Source),
            "domain" => Ok(AggregateColumn::Domain),
            other => Err(format!("unsupported aggregate column: {other}")),
        }
    }
}

/// Columns the corpus can be searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchColumn {
    Url,
    Source,
    Notes,
    Target,
    Domain,
}

impl SearchColumn {
    fn as_sql(self) -> &'static str {
        match self {
            SearchColumn::Url => "url",
            SearchColumn::Source => "source",
            SearchColumn::Notes => "notes",
            SearchColumn::Target => "target",
            SearchColumn::Domain => "domain",
        }
    }
}

impl std::str::FromStr for SearchColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "url" => Ok(SearchColumn::Url),
            "source" => Ok(SearchColumn::Source),
            "notes" => Ok(SearchColumn::Notes),
            "target" => Ok(SearchColumn::Target),
            "domain" => Ok(SearchColumn::Domain),
            other => Err(format!("unsupported search column: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Exact,
    Contains,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(SearchMode::Exact),
            "contains" => Ok(SearchMode::Contains),
            other => Err(format!("unsupported search mode: {other}")),
        }
    }
}

/// One group of an aggregation: the group value and its distinct-URL count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AggregateRow {
    pub value: String,
    pub url_count: i64,
}

impl Store {
    /// Count distinct URLs per value of `column`, most-hit groups first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlx`] if the query fails.
    pub async fn aggregate(
        &self,
        column: AggregateColumn,
    ) -> Result<Vec<AggregateRow>, StoreError> {
        // The identifier comes from the enum above, never from user input.
        let sql = format!(
            "SELECT {col} AS value, COUNT(DISTINCT url) AS url_count \
             FROM corpus GROUP BY {col} ORDER BY url_count DESC, value",
            col = column.as_sql()
        );
        let rows = sqlx::query_as::<_, AggregateRow>(&sql)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    /// Return the records matching `term` on `column`.
    ///
    /// `Exact` compares the whole field; `Contains` matches a literal
    /// substring. Dated records come first, newest to oldest; undated
    /// records sort last.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails or a stored row is invalid.
    pub async fn search(
        &self,
        term: &str,
        column: SearchColumn,
        mode: SearchMode,
    ) -> Result<Vec<ThreatRecord>, StoreError> {
        let predicate = match mode {
            SearchMode::Exact => format!("{} = ?1", column.as_sql()),
            // instr() is a literal substring match: no LIKE wildcards to escape.
            SearchMode::Contains => format!("instr({}, ?1) > 0", column.as_sql()),
        };
        let sql = format!(
            "SELECT url, source, date, notes, target, domain FROM corpus \
             WHERE {predicate} ORDER BY date IS NULL, date DESC"
        );

        let rows = sqlx::query_as::<_, CorpusRow>(&sql)
            .bind(term)
            .fetch_all(self.pool())
            .await?;

        rows.into_iter().map(ThreatRecord::try_from).collect()
    }

    /// Whether any record matches `term` on `column`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlx`] if the query fails.
    pub async fn search_exists(
        &self,
        term: &str,
        column: SearchColumn,
        mode: SearchMode,
    ) -> Result<bool, StoreError> {
        let predicate = match mode {
            SearchMode::Exact => format!("{} = ?1", column.as_sql()),
            SearchMode::Contains => format!("instr({}, ?1) > 0", column.as_sql()),
        };
        let sql = format!("SELECT EXISTS(SELECT 1 FROM corpus WHERE {predicate})");

        let exists = sqlx::query_scalar::<_, i64>(&sql)
            .bind(term)
            .fetch_one(self.pool())
            .await?;
        Ok(exists != 0)
    }
}

//! Flat CSV snapshot of the corpus.
//!
//! The snapshot is the portable representation: the same columns as the
//! table, one file, importable anywhere. Writes go to a temp file that is
//! renamed over the old snapshot, so readers of the file never see a
//! truncated version.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use phishdb_core::{FeedSource, ThreatRecord};
use serde::{Deserialize, Serialize};

use crate::StoreError;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "URL")]
    url: String,
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Date")]
    date: Option<DateTime<Utc>>,
    #[serde(rename = "Notes")]
    notes: String,
    #[serde(rename = "Target")]
    target: String,
    #[serde(rename = "Domain")]
    domain: String,
}

impl From<&ThreatRecord> for SnapshotRow {
    fn from(record: &ThreatRecord) -> Self {
        Self {
            url: record.url.clone(),
            source: record.source.as_str().to_string(),
            date: record.date,
            notes: record.notes.clone(),
            target: record.target.clone(),
            domain: record.domain.clone(),
        }
    }
}

impl TryFrom<SnapshotRow> for ThreatRecord {
    type Error = StoreError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let source =
            FeedSource::from_str(&row.source).map_err(|e| StoreError::UnknownSource(e.0))?;
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

pub(crate) fn write(path: &Path, corpus: &[ThreatRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for record in corpus {
            writer.serialize(SnapshotRow::from(record))?;
        }
        writer.flush().map_err(StoreError::SnapshotIo)?;
    }

    // Atomic on the same filesystem; the old snapshot stays intact until here.
    std::fs::rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn read(path: &Path) -> Result<Vec<ThreatRecord>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut corpus = Vec::new();
    for row in reader.deserialize::<SnapshotRow>() {
        corpus.push(ThreatRecord::try_from(row?)?);
    }
    Ok(corpus)
}

//! Schema normalization: raw feed rows into [`ThreatRecord`]s.

use chrono::{DateTime, NaiveDateTime, Utc};
use phishdb_core::{registrable_domain, FeedSource, ThreatRecord, UNCLASSIFIED_TARGET};

/// Build a normalized record from one raw feed row.
///
/// The URL is lowercased whole-string (not just the host), an empty or
/// missing target becomes the sentinel, and the registrable domain is
/// derived immediately so a batch is complete even before merging.
pub(crate) fn threat_record(
    source: FeedSource,
    raw_url: &str,
    date: Option<DateTime<Utc>>,
    notes: String,
    target: Option<&str>,
) -> ThreatRecord {
    let url = raw_url.trim().to_lowercase();
    let domain = registrable_domain(&url);
    let target = match target {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => UNCLASSIFIED_TARGET.to_string(),
    };
    ThreatRecord {
        url,
        source,
        date,
        notes,
        target,
        domain,
    }
}

/// Parse a feed-reported timestamp, swallowing failures into `None`.
///
/// Tries RFC 3339 first (PhishTank submission times carry an offset), then
/// the bare `YYYY-MM-DD HH:MM:SS` form used by PhishStats and URLhaus,
/// interpreted as UTC.
#[must_use]
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

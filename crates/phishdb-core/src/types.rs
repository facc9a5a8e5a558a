//! Shared record types for the phishing-URL corpus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel `target` value for records whose impersonated brand is unknown.
pub const UNCLASSIFIED_TARGET: &str = "Other";

/// Identifier of a threat feed. Serialized lowercase everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    OpenPhish,
    PhishStats,
    PhishTank,
    UrlHaus,
}

impl FeedSource {
    /// All feeds in fixed merge-priority order. Earlier feeds win URL ties.
    pub const ALL: [FeedSource; 4] = [
        FeedSource::OpenPhish,
        FeedSource::PhishStats,
        FeedSource::PhishTank,
        FeedSource::UrlHaus,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeedSource::OpenPhish => "openphish",
            FeedSource::PhishStats => "phishstats",
            FeedSource::PhishTank => "phishtank",
            FeedSource::UrlHaus => "urlhaus",
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown feed source: {0}")]
pub struct UnknownSourceError(pub String);

impl std::str::FromStr for FeedSource {
    type Err = UnknownSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openphish" => Ok(FeedSource::OpenPhish),
            "phishstats" => Ok(FeedSource::PhishStats),
            "phishtank" => Ok(FeedSource::PhishTank),
            "urlhaus" => Ok(FeedSource::UrlHaus),
            other => Err(UnknownSourceError(other.to_string())),
        }
    }
}

/// One observed malicious or suspicious URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRecord {
    /// Full URL, lowercased. Primary key of the corpus.
    pub url: String,
    pub source: FeedSource,
    /// When the source reported the URL. `None` when missing or unparsable.
    pub date: Option<DateTime<Utc>>,
    /// Source-specific annotation: a score, a detail-page link, a threat tag.
    pub notes: String,
    /// Impersonated brand, or [`UNCLASSIFIED_TARGET`].
    pub target: String,
    /// Registrable domain derived from `url`; recomputed on every merge.
    pub domain: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn feed_source_serializes_lowercase() {
        let json = serde_json::to_string(&FeedSource::OpenPhish).unwrap();
        assert_eq!(json, "\"openphish\"");
    }

    #[test]
    fn feed_source_round_trips_through_str() {
        for source in FeedSource::ALL {
            assert_eq!(FeedSource::from_str(source.as_str()).unwrap(), source);
        }
    }

    #[test]
    fn feed_source_parse_is_case_insensitive() {
        assert_eq!(
            FeedSource::from_str("PhishTank").unwrap(),
            FeedSource::PhishTank
        );
    }

    #[test]
    fn unknown_feed_source_is_an_error() {
        assert!(FeedSource::from_str("definitely-not-a-feed").is_err());
    }
}

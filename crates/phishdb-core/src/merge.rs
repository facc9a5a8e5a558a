//! Merge/dedup engine for refresh cycles.

use std::collections::HashSet;

use crate::domain::registrable_domain;
use crate::types::ThreatRecord;

/// Combine this cycle's fresh batches with the prior corpus.
///
/// `fresh` must already be concatenated in fixed adapter order
/// ([`crate::FeedSource::ALL`]); the prior corpus is appended after it and
/// duplicates collapse keep-first. A record fetched this cycle therefore
/// always wins over the stored record for the same URL, and among fresh
/// batches adapter order breaks ties.
///
/// Every surviving record has its URL re-lowercased and its domain
/// recomputed, so changes to the domain heuristic apply retroactively to the
/// whole corpus. The result never loses a URL: merging with an empty fresh
/// set returns the prior corpus unchanged, and merging the output back with
/// the same fresh input is a fixed point.
#[must_use]
pub fn merge(fresh: Vec<ThreatRecord>, prior: Vec<ThreatRecord>) -> Vec<ThreatRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut corpus: Vec<ThreatRecord> = Vec::with_capacity(fresh.len() + prior.len());

    for mut record in fresh.into_iter().chain(prior) {
        record.url = record.url.to_lowercase();
        if !seen.insert(record.url.clone()) {
            continue;
        }
        record.domain = registrable_domain(&record.url);
        corpus.push(record);
    }

    corpus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeedSource, UNCLASSIFIED_TARGET};

    fn record(url: &str, source: FeedSource, notes: &str) -> ThreatRecord {
        ThreatRecord {
            url: url.to_string(),
            source,
            date: None,
            notes: notes.to_string(),
            target: UNCLASSIFIED_TARGET.to_string(),
            domain: String::new(),
        }
    }

    #[test]
    fn no_two_records_share_a_url() {
        let fresh = vec![
            record("http://a.test/1", FeedSource::OpenPhish, ""),
            record("http://a.test/1", FeedSource::PhishStats, ""),
            record("http://b.test/2", FeedSource::PhishTank, ""),
        ];
        let prior = vec![record("http://a.test/1", FeedSource::UrlHaus, "")];

        let corpus = merge(fresh, prior);

        let mut urls: Vec<&str> = corpus.iter().map(|r| r.url.as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), corpus.len());
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn fresh_record_wins_over_prior() {
        let fresh = vec![record(
            "http://phish.test/login",
            FeedSource::OpenPhish,
            "fresh notes",
        )];
        let prior = vec![record(
            "http://phish.test/login",
            FeedSource::OpenPhish,
            "stale notes",
        )];

        let corpus = merge(fresh, prior);

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].notes, "fresh notes");
    }

    #[test]
    fn adapter_order_breaks_ties_among_fresh_batches() {
        // fetch order: openphish first, so its record survives
        let fresh = vec![
            record("http://dup.test/x", FeedSource::OpenPhish, "first"),
            record("http://dup.test/x", FeedSource::UrlHaus, "second"),
        ];

        let corpus = merge(fresh, Vec::new());

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].source, FeedSource::OpenPhish);
        assert_eq!(corpus[0].notes, "first");
    }

    #[test]
    fn urls_are_lowercased_before_dedup() {
        let fresh = vec![record(
            "HTTP://Example.COM/Path",
            FeedSource::OpenPhish,
            "",
        )];
        let prior = vec![record("http://example.com/path", FeedSource::PhishTank, "")];

        let corpus = merge(fresh, prior);

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].url, "http://example.com/path");
        assert_eq!(corpus[0].source, FeedSource::OpenPhish);
    }

    #[test]
    fn prior_urls_never_disappear() {
        let fresh = vec![record("http://new.test/1", FeedSource::OpenPhish, "")];
        let prior = vec![
            record("http://old.test/1", FeedSource::PhishStats, ""),
            record("http://old.test/2", FeedSource::UrlHaus, ""),
        ];

        let corpus = merge(fresh, prior);

        assert_eq!(corpus.len(), 3);
        assert!(corpus.iter().any(|r| r.url == "http://old.test/1"));
        assert!(corpus.iter().any(|r| r.url == "http://old.test/2"));
    }

    #[test]
    fn merge_is_idempotent_without_new_upstream_rows() {
        let fresh = vec![
            record("http://a.test/1", FeedSource::OpenPhish, "n1"),
            record("http://b.test/2", FeedSource::PhishStats, "n2"),
        ];
        let prior = vec![record("http://c.test/3", FeedSource::UrlHaus, "n3")];

        let once = merge(fresh.clone(), prior);
        let twice = merge(fresh, once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn cold_start_with_empty_prior_keeps_deduped_fresh_batches() {
        let fresh = vec![
            record("http://a.test/1", FeedSource::OpenPhish, ""),
            record("http://a.test/1", FeedSource::OpenPhish, ""),
            record("http://b.test/2", FeedSource::PhishTank, ""),
        ];

        let corpus = merge(fresh, Vec::new());

        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn domain_is_recomputed_for_surviving_records() {
        let mut stale = record("http://sub.example.com/x", FeedSource::UrlHaus, "");
        stale.domain = "stale-domain.invalid".to_string();

        let corpus = merge(Vec::new(), vec![stale]);

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].domain, "example.com");
    }
}

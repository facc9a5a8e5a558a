//! The four feed adapters.
//!
//! Each module knows one wire format and returns parsed rows; [`fetch_feed`]
//! is the shared boundary that downgrades any failure to a `Failed` batch
//! and applies the batch-level keep-first dedup.

mod openphish;
mod phishstats;
mod phishtank;
mod urlhaus;

use std::collections::HashSet;

use phishdb_core::FeedSource;

use crate::client::FeedClient;
use crate::error::FeedError;
use crate::types::{FeedBatch, FetchStatus, ParsedRows};

/// Fetch one feed. Never returns an error: transport, schema, and parse
/// failures all collapse into a `Failed` batch with the cause recorded.
pub async fn fetch_feed(client: &FeedClient, source: FeedSource) -> FeedBatch {
    let result: Result<ParsedRows, FeedError> = match source {
        FeedSource::OpenPhish => openphish::fetch(client).await,
        FeedSource::PhishStats => phishstats::fetch(client).await,
        FeedSource::PhishTank => phishtank::fetch(client).await,
        FeedSource::UrlHaus => urlhaus::fetch(client).await,
    };

    match result {
        Ok(rows) => {
            let ParsedRows {
                mut records,
                fetched,
                discarded,
            } = rows;

            // Keep-first within the batch: source-internal order decides.
            let mut seen: HashSet<String> = HashSet::new();
            records.retain(|r| seen.insert(r.url.clone()));

            let status = if discarded > 0 {
                FetchStatus::Partial
            } else {
                FetchStatus::Ok
            };
            tracing::debug!(
                source = %source,
                kept = records.len(),
                fetched,
                discarded,
                "collected feed batch"
            );
            FeedBatch {
                source,
                records,
                status,
                fetched,
                discarded,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(
                source = %source,
                error = %e,
                "feed fetch failed; source contributes nothing this cycle"
            );
            FeedBatch::failed(source, e.to_string())
        }
    }
}

/// Fetch all four feeds concurrently.
///
/// The feeds are independent network calls with very different cadences and
/// failure modes, so none is serialized behind another. Results come back in
/// fixed adapter order ([`FeedSource::ALL`]), which is the merge priority.
pub async fn fetch_all_feeds(client: &FeedClient) -> Vec<FeedBatch> {
    let (openphish, phishstats, phishtank, urlhaus) = tokio::join!(
        fetch_feed(client, FeedSource::OpenPhish),
        fetch_feed(client, FeedSource::PhishStats),
        fetch_feed(client, FeedSource::PhishTank),
        fetch_feed(client, FeedSource::UrlHaus),
    );
    vec![openphish, phishstats, phishtank, urlhaus]
}

/// Skip the first `n` lines of a body, returning the remainder.
pub(crate) fn skip_lines(body: &str, n: usize) -> &str {
    let mut rest = body;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_lines_drops_exactly_n_lines() {
        let body = "one\ntwo\nthree\nfour";
        assert_eq!(skip_lines(body, 0), body);
        assert_eq!(skip_lines(body, 2), "three\nfour");
    }

    #[test]
    fn skip_lines_past_the_end_yields_empty() {
        assert_eq!(skip_lines("one\ntwo", 5), "");
    }
}

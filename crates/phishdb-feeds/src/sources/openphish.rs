//! OpenPhish plain-list adapter.
//!
//! The feed is a newline-delimited list of URLs with no metadata, refreshed
//! upstream every 12 hours. Every record in a batch shares one generation
//! timestamp and fixed default annotations.

use chrono::{DateTime, Utc};
use phishdb_core::FeedSource;

use crate::client::FeedClient;
use crate::error::FeedError;
use crate::normalize::threat_record;
use crate::types::ParsedRows;

const FEED_PATH: &str = "/feed.txt";
const FEED_NOTES: &str = "Free Dataset";

pub(super) async fn fetch(client: &FeedClient) -> Result<ParsedRows, FeedError> {
    let url = format!(
        "{}{FEED_PATH}",
        client.endpoints().openphish_base_url.trim_end_matches('/')
    );
    let body = client.get_text(&url).await?;
    Ok(parse(&body, Utc::now()))
}

fn parse(body: &str, generated_at: DateTime<Utc>) -> ParsedRows {
    let mut records = Vec::new();
    let mut fetched = 0;

    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        fetched += 1;
        records.push(threat_record(
            FeedSource::OpenPhish,
            line,
            Some(generated_at),
            FEED_NOTES.to_string(),
            None,
        ));
    }

    ParsedRows {
        records,
        fetched,
        discarded: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishdb_core::UNCLASSIFIED_TARGET;

    #[test]
    fn every_non_empty_line_becomes_a_record() {
        let body = "http://a.test/1\n\nHTTP://B.Test/2\n   \nhttp://c.test/3\n";
        let rows = parse(body, Utc::now());

        assert_eq!(rows.fetched, 3);
        assert_eq!(rows.discarded, 0);
        assert_eq!(rows.records.len(), 3);
        assert_eq!(rows.records[1].url, "http://b.test/2");
    }

    #[test]
    fn records_share_the_generation_timestamp_and_defaults() {
        let stamp = Utc::now();
        let rows = parse("http://a.test/1\nhttp://b.test/2", stamp);

        for record in &rows.records {
            assert_eq!(record.date, Some(stamp));
            assert_eq!(record.notes, FEED_NOTES);
            assert_eq!(record.target, UNCLASSIFIED_TARGET);
            assert_eq!(record.source, FeedSource::OpenPhish);
        }
    }

    #[test]
    fn empty_body_yields_empty_batch() {
        let rows = parse("", Utc::now());
        assert!(rows.records.is_empty());
        assert_eq!(rows.fetched, 0);
    }
}

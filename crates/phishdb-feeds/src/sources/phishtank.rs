//! PhishTank authenticated-CSV adapter.
//!
//! The download URL embeds the caller's access key. The payload is a
//! headered CSV whose columns are renamed into the common vocabulary:
//! `url` → URL, `phish_detail_url` → notes, `submission_time` → date,
//! `target` → target.

use phishdb_core::FeedSource;

use crate::client::FeedClient;
use crate::error::FeedError;
use crate::normalize::{parse_feed_date, threat_record};
use crate::types::ParsedRows;

pub(super) async fn fetch(client: &FeedClient) -> Result<ParsedRows, FeedError> {
    let endpoints = client.endpoints();
    let Some(key) = endpoints.phishtank_api_key.as_deref() else {
        return Err(FeedError::MissingCredentials {
            feed: FeedSource::PhishTank,
        });
    };

    let url = format!(
        "{}/data/{key}/online-valid.csv",
        endpoints.phishtank_base_url.trim_end_matches('/')
    );
    let body = client.get_text(&url).await?;
    parse(&body)
}

fn parse(body: &str) -> Result<ParsedRows, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FeedError::Schema {
            feed: FeedSource::PhishTank,
            reason: format!("unreadable header row: {e}"),
        })?
        .clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let (Some(url_idx), Some(notes_idx), Some(date_idx), Some(target_idx)) = (
        position("url"),
        position("phish_detail_url"),
        position("submission_time"),
        position("target"),
    ) else {
        return Err(FeedError::Schema {
            feed: FeedSource::PhishTank,
            reason: format!("missing expected columns in header {headers:?}"),
        });
    };

    let mut records = Vec::new();
    let mut fetched = 0;
    let mut discarded = 0;

    for row in reader.records() {
        fetched += 1;
        let Ok(row) = row else {
            discarded += 1;
            continue;
        };

        let (Some(raw_url), Some(notes), Some(date), Some(target)) = (
            row.get(url_idx),
            row.get(notes_idx),
            row.get(date_idx),
            row.get(target_idx),
        ) else {
            discarded += 1;
            continue;
        };
        if raw_url.trim().is_empty() {
            discarded += 1;
            continue;
        }

        records.push(threat_record(
            FeedSource::PhishTank,
            raw_url,
            parse_feed_date(date),
            notes.to_string(),
            Some(target),
        ));
    }

    Ok(ParsedRows {
        records,
        fetched,
        discarded,
    })
}

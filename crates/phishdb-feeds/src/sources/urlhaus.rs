//! URLhaus compressed-CSV adapter.
//!
//! The feed ships as a zip archive containing a single CSV entry with a
//! fixed block of comment lines before the header. Only the url, dateadded,
//! and threat columns are kept, renamed into the common vocabulary.

use std::io::Read;

use phishdb_core::FeedSource;

use crate::client::FeedClient;
use crate::error::FeedError;
use crate::normalize::{parse_feed_date, threat_record};
use crate::sources::skip_lines;
use crate::types::ParsedRows;

const FEED_PATH: &str = "/downloads/csv/";
/// Comment lines before the header row inside the archived CSV.
const HEADER_SKIP_LINES: usize = 8;

pub(super) async fn fetch(client: &FeedClient) -> Result<ParsedRows, FeedError> {
    let url = format!(
        "{}{FEED_PATH}",
        client.endpoints().urlhaus_base_url.trim_end_matches('/')
    );
    let bytes = client.get_bytes(&url).await?;
    let body = unzip_first_entry(&bytes)?;
    parse(&body)
}

fn unzip_first_entry(bytes: &[u8]) -> Result<String, FeedError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    if archive.is_empty() {
        return Err(FeedError::Schema {
            feed: FeedSource::UrlHaus,
            reason: "zip archive contains no entries".to_string(),
        });
    }
    let mut entry = archive.by_index(0)?;
    let mut body = String::new();
    entry
        .read_to_string(&mut body)
        .map_err(|e| FeedError::Schema {
            feed: FeedSource::UrlHaus,
            reason: format!("archive entry is not UTF-8 text: {e}"),
        })?;
    Ok(body)
}

fn parse(body: &str) -> Result<ParsedRows, FeedError> {
    let data = skip_lines(body, HEADER_SKIP_LINES);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FeedError::Schema {
            feed: FeedSource::UrlHaus,
            reason: format!("unreadable header row: {e}"),
        })?
        .clone();
    // The first header cell carries a leading "# " comment marker.
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().trim_start_matches("# ") == name)
    };

    let (Some(url_idx), Some(date_idx), Some(notes_idx)) =
        (position("url"), position("dateadded"), position("threat"))
    else {
        return Err(FeedError::Schema {
            feed: FeedSource::UrlHaus,
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

        let (Some(raw_url), Some(date), Some(threat)) =
            (row.get(url_idx), row.get(date_idx), row.get(notes_idx))
        else {
            discarded += 1;
            continue;
        };
        if raw_url.trim().is_empty() {
            discarded += 1;
            continue;
        }

        records.push(threat_record(
            FeedSource::UrlHaus,
            raw_url,
            parse_feed_date(date),
            threat.to_string(),
            None,
        ));
    }

    Ok(ParsedRows {
        records,
        fetched,
        discarded,
    })
}

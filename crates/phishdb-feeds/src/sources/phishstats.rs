//! PhishStats preamble-CSV adapter.
//!
//! The endpoint serves a headerless CSV preceded by a fixed block of license
//! comment lines. Rows are `date, score, url, ip`; the ip column is dropped
//! and the score is folded into the notes.

use phishdb_core::FeedSource;

use crate::client::FeedClient;
use crate::error::FeedError;
use crate::normalize::{parse_feed_date, threat_record};
use crate::sources::skip_lines;
use crate::types::ParsedRows;

const FEED_PATH: &str = "/phish_score.csv";
/// Non-data license lines before the first row.
const PREAMBLE_LINES: usize = 9;
const EXPECTED_COLUMNS: usize = 4;

pub(super) async fn fetch(client: &FeedClient) -> Result<ParsedRows, FeedError> {
    let url = format!(
        "{}{FEED_PATH}",
        client.endpoints().phishstats_base_url.trim_end_matches('/')
    );
    let body = client.get_text(&url).await?;
    parse(&body)
}

fn parse(body: &str) -> Result<ParsedRows, FeedError> {
    let data = skip_lines(body, PREAMBLE_LINES);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut records = Vec::new();
    let mut fetched = 0;
    let mut discarded = 0;

    for row in reader.records() {
        fetched += 1;
        let Ok(row) = row else {
            discarded += 1;
            continue;
        };

        if row.len() != EXPECTED_COLUMNS {
            discarded += 1;
            continue;
        }

        let date_field = &row[0];
        // Rows whose date field itself contains a comma are known upstream
        // anomalies; drop them rather than guess at the column alignment.
        if date_field.contains(',') {
            discarded += 1;
            continue;
        }

        let raw_url = &row[2];
        if raw_url.trim().is_empty() {
            discarded += 1;
            continue;
        }

        let score = &row[1];
        records.push(threat_record(
            FeedSource::PhishStats,
            raw_url,
            parse_feed_date(date_field),
            format!("Score: {score}"),
            None,
        ));
    }

    if records.is_empty() && discarded > 0 {
        // Nothing parsed at all: the response does not match the expected
        // column layout (e.g. an error page), not a handful of bad rows.
        return Err(FeedError::Schema {
            feed: FeedSource::PhishStats,
            reason: format!("no parseable rows ({discarded} discarded)"),
        });
    }

    Ok(ParsedRows {
        records,
        fetched,
        discarded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &str = "\
######################################################\n\
# PhishScore | PhishStats                            #\n\
# Score ranges: 0-2 likely                           #\n\
# 2-4 suspicious                                     #\n\
# 4-6 phishing                                       #\n\
# 6-10 omg phishing!                                 #\n\
# Ranges may be adjusted without notice.             #\n\
# CSV: Date,Score,URL,IP                             #\n\
######################################################\n";

    #[test]
    fn parses_rows_after_the_preamble() {
        let body = format!(
            "{PREAMBLE}\"2024-03-01 10:00:00\",\"6.5\",\"http://Phish.Test/a\",\"1.2.3.4\"\n\
             \"2024-03-01 11:00:00\",\"2.1\",\"http://other.test/b\",\"5.6.7.8\"\n"
        );
        let rows = parse(&body).unwrap();

        assert_eq!(rows.records.len(), 2);
        assert_eq!(rows.discarded, 0);
        assert_eq!(rows.records[0].url, "http://phish.test/a");
        assert_eq!(rows.records[0].notes, "Score: 6.5");
        assert!(rows.records[0].date.is_some());
    }

    #[test]
    fn drops_rows_with_commas_in_the_date_field() {
        let body = format!(
            "{PREAMBLE}\"2024-03-01 10:00:00\",\"6.5\",\"http://good.test/a\",\"1.2.3.4\"\n\
             \"March 1, 2024\",\"1.0\",\"http://anomaly.test/b\",\"5.6.7.8\"\n"
        );
        let rows = parse(&body).unwrap();

        assert_eq!(rows.records.len(), 1);
        assert_eq!(rows.discarded, 1);
        assert_eq!(rows.records[0].url, "http://good.test/a");
    }

    #[test]
    fn drops_rows_with_wrong_column_count() {
        let body = format!(
            "{PREAMBLE}\"2024-03-01 10:00:00\",\"6.5\",\"http://good.test/a\",\"1.2.3.4\"\n\
             \"2024-03-01 11:00:00\",\"http://short.test/b\"\n"
        );
        let rows = parse(&body).unwrap();

        assert_eq!(rows.records.len(), 1);
        assert_eq!(rows.discarded, 1);
    }

    #[test]
    fn unparseable_payload_is_a_schema_error() {
        // An error page instead of CSV: every line left after the preamble
        // skip has the wrong column count, so nothing parses.
        let garbage = "only-one-column\n".repeat(12);
        assert!(matches!(parse(&garbage), Err(FeedError::Schema { .. })));
    }

    #[test]
    fn empty_feed_is_ok_and_empty() {
        let rows = parse(PREAMBLE).unwrap();
        assert!(rows.records.is_empty());
        assert_eq!(rows.discarded, 0);
    }
}

use phishdb_core::FeedSource;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("schema mismatch in {feed} feed: {reason}")]
    Schema { feed: FeedSource, reason: String },

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{feed} feed requires an access key but none is configured")]
    MissingCredentials { feed: FeedSource },
}

//! Feed adapters for the phishing-URL intelligence corpus.
//!
//! One fetch capability, four wire formats: a plain URL list, a CSV with a
//! fixed preamble, an access-keyed CSV, and a zip-compressed CSV. Every
//! adapter downgrades transport, schema, and parse failures to an empty
//! `Failed` batch so that one broken feed never aborts a refresh cycle.

mod client;
mod error;
mod normalize;
mod retry;
mod sources;
mod types;

pub use client::{FeedClient, FeedEndpoints};
pub use error::FeedError;
pub use normalize::parse_feed_date;
pub use sources::{fetch_all_feeds, fetch_feed};
pub use types::{FeedBatch, FetchStatus};

//! HTTP client shared by the feed adapters.

use std::time::Duration;

use reqwest::Client;

use crate::error::FeedError;
use crate::retry::retry_with_backoff;

/// Base URLs and credentials for the four feeds.
///
/// Kept separate from [`FeedClient`] so tests can point every feed at a mock
/// server without touching process configuration.
#[derive(Clone)]
pub struct FeedEndpoints {
    pub openphish_base_url: String,
    pub phishstats_base_url: String,
    pub phishtank_base_url: String,
    pub urlhaus_base_url: String,
    pub phishtank_api_key: Option<String>,
}

impl FeedEndpoints {
    #[must_use]
    pub fn from_config(config: &phishdb_core::AppConfig) -> Self {
        Self {
            openphish_base_url: config.openphish_base_url.clone(),
            phishstats_base_url: config.phishstats_base_url.clone(),
            phishtank_base_url: config.phishtank_base_url.clone(),
            urlhaus_base_url: config.urlhaus_base_url.clone(),
            phishtank_api_key: config.phishtank_api_key.clone(),
        }
    }

    /// Point every feed at the same base URL. Intended for wiremock tests.
    #[must_use]
    pub fn all_at(base_url: &str) -> Self {
        Self {
            openphish_base_url: base_url.to_string(),
            phishstats_base_url: base_url.to_string(),
            phishtank_base_url: base_url.to_string(),
            urlhaus_base_url: base_url.to_string(),
            phishtank_api_key: Some("test-key".to_string()),
        }
    }
}

impl std::fmt::Debug for FeedEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedEndpoints")
            .field("openphish_base_url", &self.openphish_base_url)
            .field("phishstats_base_url", &self.phishstats_base_url)
            .field("phishtank_base_url", &self.phishtank_base_url)
            .field("urlhaus_base_url", &self.urlhaus_base_url)
            .field(
                "phishtank_api_key",
                &self.phishtank_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// HTTP client for the feed endpoints.
///
/// Carries the per-request timeout (a slow feed degrades to a failed batch,
/// it never blocks the cycle indefinitely), the User-Agent, and the retry
/// policy for transient network errors.
pub struct FeedClient {
    client: Client,
    endpoints: FeedEndpoints,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl FeedClient {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &phishdb_core::AppConfig) -> Result<Self, FeedError> {
        Self::new(
            FeedEndpoints::from_config(config),
            config.feed_timeout_secs,
            &config.feed_user_agent,
            config.feed_max_retries,
            config.feed_retry_backoff_base_secs,
        )
    }

    /// Creates a client with explicit endpoints (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoints: FeedEndpoints,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoints,
            max_retries,
            backoff_base_secs,
        })
    }

    pub(crate) fn endpoints(&self) -> &FeedEndpoints {
        &self.endpoints
    }

    /// GET a text endpoint, retrying transient network errors.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] on network failure after all retries, or
    /// [`FeedError::UnexpectedStatus`] on a non-2xx response.
    pub(crate) async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_string();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FeedError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await
    }

    /// GET a binary endpoint, retrying transient network errors.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] on network failure after all retries, or
    /// [`FeedError::UnexpectedStatus`] on a non-2xx response.
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_string();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FeedError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
        })
        .await
    }
}

//! Opaque URL-classification collaborator.
//!
//! The classifier is an external service wrapped behind a narrow interface:
//! one URL in, one label out. The ingestion pipeline has zero dependency on
//! this crate — classification never touches the corpus.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Classifier verdict for a single URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Malicious,
    Benign,
    Unknown,
}

impl Verdict {
    /// Map a service label onto a verdict. Anything unrecognized is
    /// `Unknown` — the collaborator's vocabulary may grow without
    /// breaking callers.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "malicious" => Verdict::Malicious,
            "benign" => Verdict::Benign,
            _ => Verdict::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Malicious => "malicious",
            Verdict::Benign => "benign",
            Verdict::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    label: String,
}

/// HTTP client for the deployed classifier service.
pub struct RemoteClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteClassifier {
    /// Creates a classifier client for the given service base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Classify a single URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Http`] on network failure or a non-2xx
    /// response from the service.
    pub async fn classify(&self, url: &str) -> Result<Verdict, ClassifyError> {
        let endpoint = format!("{}/classify", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .json(&ClassifyRequest { url })
            .send()
            .await?
            .error_for_status()?;
        let body: ClassifyResponse = response.json().await?;
        Ok(Verdict::from_label(&body.label))
    }
}

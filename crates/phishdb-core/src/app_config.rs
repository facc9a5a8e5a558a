use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// SQLite file holding the queryable corpus representation.
    pub database_path: PathBuf,
    /// Flat CSV snapshot of the corpus, for portability/export.
    pub snapshot_path: PathBuf,
    pub openphish_base_url: String,
    pub phishstats_base_url: String,
    pub phishtank_base_url: String,
    pub urlhaus_base_url: String,
    /// Access key embedded in the PhishTank download URL. Without it the
    /// PhishTank source degrades to failed instead of aborting the cycle.
    pub phishtank_api_key: Option<String>,
    /// Endpoint of the URL-classifier collaborator, if deployed.
    pub classifier_url: Option<String>,
    pub feed_timeout_secs: u64,
    pub feed_user_agent: String,
    pub feed_max_retries: u32,
    pub feed_retry_backoff_base_secs: u64,
    /// Cron expression for the scheduled refresh job.
    pub refresh_cron: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_path", &self.database_path)
            .field("snapshot_path", &self.snapshot_path)
            .field("openphish_base_url", &self.openphish_base_url)
            .field("phishstats_base_url", &self.phishstats_base_url)
            .field("phishtank_base_url", &self.phishtank_base_url)
            .field("urlhaus_base_url", &self.urlhaus_base_url)
            .field(
                "phishtank_api_key",
                &self.phishtank_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("classifier_url", &self.classifier_url)
            .field("feed_timeout_secs", &self.feed_timeout_secs)
            .field("feed_user_agent", &self.feed_user_agent)
            .field("feed_max_retries", &self.feed_max_retries)
            .field(
                "feed_retry_backoff_base_secs",
                &self.feed_retry_backoff_base_secs,
            )
            .field("refresh_cron", &self.refresh_cron)
            .finish()
    }
}

pub mod app_config;
pub mod config;
pub mod domain;
pub mod merge;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::registrable_domain;
pub use merge::merge;
pub use types::{FeedSource, ThreatRecord, UnknownSourceError, UNCLASSIFIED_TARGET};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PHISHDB_ENV", "development"));
    let bind_addr = parse_addr("PHISHDB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PHISHDB_LOG_LEVEL", "info");

    let database_path = PathBuf::from(or_default(
        "PHISHDB_DATABASE_PATH",
        "./data/primary.sqlite",
    ));
    let snapshot_path = PathBuf::from(or_default("PHISHDB_SNAPSHOT_PATH", "./data/primary.csv"));

    let openphish_base_url = or_default("PHISHDB_OPENPHISH_BASE_URL", "https://openphish.com");
    let phishstats_base_url = or_default("PHISHDB_PHISHSTATS_BASE_URL", "https://phishstats.info");
    let phishtank_base_url = or_default("PHISHDB_PHISHTANK_BASE_URL", "http://data.phishtank.com");
    let urlhaus_base_url = or_default("PHISHDB_URLHAUS_BASE_URL", "https://urlhaus.abuse.ch");
    let phishtank_api_key = lookup("PHISHTANK_API_KEY").ok();
    let classifier_url = lookup("PHISHDB_CLASSIFIER_URL").ok();

    let feed_timeout_secs = parse_u64("PHISHDB_FEED_TIMEOUT_SECS", "60")?;
    let feed_user_agent = or_default(
        "PHISHDB_FEED_USER_AGENT",
        "phishdb/0.1 (threat-feed-aggregation)",
    );
    let feed_max_retries = parse_u32("PHISHDB_FEED_MAX_RETRIES", "2")?;
    let feed_retry_backoff_base_secs = parse_u64("PHISHDB_FEED_RETRY_BACKOFF_BASE_SECS", "5")?;

    // Every 6 hours — the slowest feed updates twice a day.
    let refresh_cron = or_default("PHISHDB_REFRESH_CRON", "0 0 */6 * * *");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        database_path,
        snapshot_path,
        openphish_base_url,
        phishstats_base_url,
        phishtank_base_url,
        urlhaus_base_url,
        phishtank_api_key,
        classifier_url,
        feed_timeout_secs,
        feed_user_agent,
        feed_max_retries,
        feed_retry_backoff_base_secs,
        refresh_cron,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub identity_region: String,
    pub identity_client_id: String,
    /// Overrides the regional user-pool endpoint.
    pub identity_endpoint: Option<String>,
    pub profile_api_url: String,
    pub resume_build_url: String,
    pub guard_recheck_timeout: Duration,
    pub http_timeout: Duration,
    pub session_flags_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let millis = |key: &str, default: u64| -> Result<Duration> {
            lookup(key)
                .map(|v| v.parse::<u64>())
                .transpose()
                .with_context(|| format!("{key} must be a whole number"))
                .map(|v| Duration::from_millis(v.unwrap_or(default)))
        };

        Ok(Config {
            identity_region: lookup("IDENTITY_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            identity_client_id: require("IDENTITY_CLIENT_ID")?,
            identity_endpoint: lookup("IDENTITY_ENDPOINT").filter(|v| !v.trim().is_empty()),
            profile_api_url: require("PROFILE_API_URL")?,
            resume_build_url: require("RESUME_BUILD_URL")?,
            guard_recheck_timeout: millis("GUARD_RECHECK_TIMEOUT_MS", 5_000)?,
            http_timeout: Duration::from_secs(
                lookup("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|| "120".to_string())
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_flags_path: lookup("SESSION_FLAGS_PATH")
                .unwrap_or_else(|| ".session-flags.json".to_string())
                .into(),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

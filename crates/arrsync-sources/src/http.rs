use anyhow::{Context, Result};
use arrsync_config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Shared HTTP client; timeouts live here rather than in the pipeline
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
        .context("Failed to create HTTP client")
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

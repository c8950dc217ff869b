use arrsync_models::WatchlistEntry;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use crate::error::SourceError;
use crate::http::join_url;
use crate::plex::parser::parse_watchlist;
use crate::traits::WatchlistSource;

const SERVICE: &str = "plex";
const WATCHLIST_PATH: &str = "library/sections/watchlist/all";

/// Reads the account watchlist from the Plex metadata provider
pub struct PlexWatchlistClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PlexWatchlistClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn watchlist_url(&self) -> String {
        join_url(&self.base_url, WATCHLIST_PATH)
    }
}

#[async_trait]
impl WatchlistSource for PlexWatchlistClient {
    fn source_name(&self) -> &str {
        "Plex"
    }

    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistEntry>, SourceError> {
        info!("Fetching Plex watchlist...");
        let url = self.watchlist_url();
        debug!("Plex: GET {}", url);

        // The token travels in the query string, keep it out of error messages
        let response = self
            .client
            .get(&url)
            .query(&[("X-Plex-Token", self.token.as_str())])
            .header(reqwest::header::ACCEPT, "application/xml")
            .send()
            .await
            .map_err(|e| SourceError::transport(SERVICE, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(SERVICE, e.without_url()))?;

        let entries = parse_watchlist(&body)?;
        info!("Found {} items in Plex watchlist", entries.len());
        Ok(entries)
    }
}

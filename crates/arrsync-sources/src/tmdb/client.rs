use arrsync_models::MediaType;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::SourceError;
use crate::http::join_url;
use crate::traits::IdentifierResolver;

const SERVICE: &str = "tmdb";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: u32,
}

/// How a single identifier is picked from a ranked search result list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Trust the upstream ranking
    #[default]
    FirstResult,
}

impl MatchPolicy {
    pub fn pick(&self, results: &[SearchResult]) -> Option<u32> {
        match self {
            MatchPolicy::FirstResult => results.first().map(|r| r.id),
        }
    }
}

/// TMDB title search
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    policy: MatchPolicy,
}

impl TmdbClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            policy: MatchPolicy::default(),
        }
    }

    fn search_url(&self, media_type: MediaType) -> String {
        let path = match media_type {
            MediaType::Show => "3/search/tv",
            _ => "3/search/movie",
        };
        join_url(&self.base_url, path)
    }
}

#[async_trait]
impl IdentifierResolver for TmdbClient {
    async fn resolve_identifier(&self, title: &str, media_type: MediaType) -> Result<Option<u32>, SourceError> {
        let url = self.search_url(media_type);
        debug!("Searching TMDB for '{}' ({})", title, media_type);

        // The API key travels in the query string, keep it out of error messages
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SourceError::transport(SERVICE, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to retrieve TMDB ID for '{}': HTTP {}", title, status.as_u16());
            return Ok(None);
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(SERVICE, e.without_url()))?;

        let parsed: SearchResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Unexpected TMDB search body for '{}': {}", title, e);
                return Ok(None);
            }
        };

        let id = self.policy.pick(&parsed.results);
        match id {
            Some(id) => debug!("TMDB: '{}' -> {} ({} result(s))", title, id, parsed.results.len()),
            None => debug!("No TMDB id found for '{}'", title),
        }
        Ok(id)
    }
}

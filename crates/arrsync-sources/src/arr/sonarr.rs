use arrsync_models::{AddOutcome, ShowAddRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};
use crate::arr::{parse_service_error, post_add, API_KEY_HEADER};
use crate::error::SourceError;
use crate::http::join_url;
use crate::traits::ShowService;

const SERVICE: &str = "sonarr";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesLookup {
    #[serde(default)]
    tvdb_id: Option<u32>,
}

pub struct SonarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SonarrClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, &format!("api/v3/{}", path))
    }
}

#[async_trait]
impl ShowService for SonarrClient {
    fn service_name(&self) -> &str {
        "Sonarr"
    }

    async fn lookup_tvdb_id(&self, term: &str) -> Result<Option<u32>, SourceError> {
        let url = self.url("series/lookup");
        debug!("Sonarr: series lookup for '{}'", term);

        let response = self
            .client
            .get(&url)
            .query(&[("term", term)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| SourceError::transport(SERVICE, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(SERVICE, e))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                service: SERVICE,
                status: status.as_u16(),
                reason: parse_service_error(status.as_u16(), &body),
            });
        }

        let results: Vec<SeriesLookup> =
            serde_json::from_str(&body).map_err(|e| SourceError::decode(SERVICE, e))?;
        let tvdb_id = results.first().and_then(|r| r.tvdb_id);
        debug!("Sonarr: '{}' -> {:?} ({} result(s))", term, tvdb_id, results.len());
        Ok(tvdb_id)
    }

    async fn add_series(&self, request: &ShowAddRequest) -> AddOutcome {
        info!("Adding {} to Sonarr...", request.title);
        debug!("Sonarr request payload: {:?}", request);
        post_add(&self.client, &self.url("series"), &self.api_key, request).await
    }
}

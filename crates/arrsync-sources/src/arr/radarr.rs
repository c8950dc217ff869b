use arrsync_models::{AddOutcome, MovieAddRequest, QualityProfile};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use crate::arr::{parse_service_error, post_add, API_KEY_HEADER};
use crate::error::SourceError;
use crate::http::join_url;
use crate::traits::MovieService;

const SERVICE: &str = "radarr";

pub struct RadarrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RadarrClient {
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
impl MovieService for RadarrClient {
    fn service_name(&self) -> &str {
        "Radarr"
    }

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError> {
        let url = self.url("qualityprofile");
        debug!("Radarr: GET {}", url);

        let response = self
            .client
            .get(&url)
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

        let profiles: Vec<QualityProfile> =
            serde_json::from_str(&body).map_err(|e| SourceError::decode(SERVICE, e))?;
        debug!("Radarr: {} quality profile(s)", profiles.len());
        Ok(profiles)
    }

    async fn add_movie(&self, request: &MovieAddRequest) -> AddOutcome {
        info!("Adding {} to Radarr...", request.title);
        debug!("Radarr request payload: {:?}", request);
        post_add(&self.client, &self.url("movie"), &self.api_key, request).await
    }
}

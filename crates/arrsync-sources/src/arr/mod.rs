//! Radarr / Sonarr v3 API clients.
//!
//! Both services share authentication (`X-Api-Key`), the 201-on-create contract
//! and the error body shape, so the add call and error sniffing live here.

pub mod radarr;
pub mod sonarr;

pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;

use arrsync_models::AddOutcome;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub(crate) const API_KEY_HEADER: &str = "X-Api-Key";

/// Human-readable reason from a service error body.
///
/// The services answer validation failures with an array of
/// `{"propertyName": ..., "errorMessage": ...}` objects; the first `errorMessage`
/// wins. Any other body falls back to the raw status code.
pub fn parse_service_error(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .as_array()?
                .first()?
                .get("errorMessage")?
                .as_str()
                .map(str::to_string)
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// POST an add request; only `201 Created` counts as added
pub(crate) async fn post_add<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    payload: &T,
) -> AddOutcome {
    let response = match client
        .post(url)
        .header(API_KEY_HEADER, api_key)
        .json(payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return AddOutcome::TransportFailed(e.to_string()),
    };

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!("POST {} -> HTTP {}: {}", url, status.as_u16(), body);

    if status == StatusCode::CREATED {
        AddOutcome::Added
    } else {
        AddOutcome::Rejected(parse_service_error(status.as_u16(), &body))
    }
}

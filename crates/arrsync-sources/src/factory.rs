//! Builds the HTTP adapters for one configured environment.
//!
//! Every environment shares the Plex and TMDB settings and gets its own
//! Radarr (and optional Sonarr) client.

use anyhow::Result;
use arrsync_config::{Config, EnvironmentConfig};
use tracing::debug;
use crate::arr::{RadarrClient, SonarrClient};
use crate::http::build_client;
use crate::plex::PlexWatchlistClient;
use crate::tmdb::TmdbClient;
use crate::traits::{IdentifierResolver, MovieService, ShowService, WatchlistSource};

/// The adapters one pipeline run talks to
pub struct ServiceSet {
    pub watchlist: Box<dyn WatchlistSource>,
    pub resolver: Box<dyn IdentifierResolver>,
    pub movies: Box<dyn MovieService>,
    pub shows: Option<Box<dyn ShowService>>,
}

pub fn create_services(config: &Config, environment: &EnvironmentConfig) -> Result<ServiceSet> {
    let client = build_client(&config.http)?;

    let watchlist = PlexWatchlistClient::new(client.clone(), &config.plex.base_url, &config.plex.token);
    let resolver = TmdbClient::new(client.clone(), &config.tmdb.base_url, &config.tmdb.api_key);
    let movies = RadarrClient::new(client.clone(), &environment.radarr.url, &environment.radarr.api_key);

    let shows = environment.sonarr.as_ref().map(|sonarr| {
        Box::new(SonarrClient::new(client.clone(), &sonarr.url, &sonarr.api_key)) as Box<dyn ShowService>
    });

    debug!(
        "Created services for environment '{}' (radarr: {}, sonarr: {})",
        environment.name,
        environment.radarr.url,
        environment
            .sonarr
            .as_ref()
            .map(|s| s.url.as_str())
            .unwrap_or("<none>")
    );

    Ok(ServiceSet {
        watchlist: Box::new(watchlist),
        resolver: Box::new(resolver),
        movies: Box::new(movies),
        shows,
    })
}

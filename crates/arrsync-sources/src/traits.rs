use arrsync_models::{AddOutcome, MediaType, MovieAddRequest, QualityProfile, ShowAddRequest, WatchlistEntry};
use async_trait::async_trait;
use crate::error::SourceError;

/// Where the watchlist comes from
#[async_trait]
pub trait WatchlistSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Fetch the full watchlist, containers first, each group in document order
    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistEntry>, SourceError>;
}

/// Title → canonical external identifier
#[async_trait]
pub trait IdentifierResolver: Send + Sync {
    /// `Ok(None)` for "no match" and for non-success statuses.
    /// Only transport failures are errors.
    async fn resolve_identifier(&self, title: &str, media_type: MediaType) -> Result<Option<u32>, SourceError>;
}

/// Movie management service (Radarr)
#[async_trait]
pub trait MovieService: Send + Sync {
    fn service_name(&self) -> &str;

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError>;

    /// Never fails: every response maps to an outcome
    async fn add_movie(&self, request: &MovieAddRequest) -> AddOutcome;
}

/// Show management service (Sonarr)
#[async_trait]
pub trait ShowService: Send + Sync {
    fn service_name(&self) -> &str;

    /// First `tvdbId` from the service's own series lookup
    async fn lookup_tvdb_id(&self, term: &str) -> Result<Option<u32>, SourceError>;

    /// Never fails: every response maps to an outcome
    async fn add_series(&self, request: &ShowAddRequest) -> AddOutcome;
}

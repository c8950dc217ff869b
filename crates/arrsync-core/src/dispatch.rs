use arrsync_models::{AddOutcome, MovieAddRequest, ServiceProfile, ShowAddRequest, ShowIdStrategy, WatchlistEntry};
use arrsync_sources::{MovieService, ShowService, SourceError};
use tracing::debug;

pub const UNRESOLVED_PROFILE: &str = "quality profile unresolved";
pub const NO_SHOW_SERVICE: &str = "no show service configured";
pub const NO_SERIES_MATCH: &str = "no series lookup match";

struct ShowTarget {
    service: Box<dyn ShowService>,
    root_folder: String,
    id_strategy: ShowIdStrategy,
}

/// Sends resolved entries to the movie or show service.
///
/// The add operations never fail; every problem becomes an `AddOutcome`.
pub struct ServiceDispatcher {
    movies: Box<dyn MovieService>,
    movie_root_folder: String,
    shows: Option<ShowTarget>,
}

impl ServiceDispatcher {
    pub fn new(movies: Box<dyn MovieService>, movie_root_folder: impl Into<String>) -> Self {
        Self {
            movies,
            movie_root_folder: movie_root_folder.into(),
            shows: None,
        }
    }

    pub fn with_shows(
        mut self,
        service: Box<dyn ShowService>,
        root_folder: impl Into<String>,
        id_strategy: ShowIdStrategy,
    ) -> Self {
        self.shows = Some(ShowTarget {
            service,
            root_folder: root_folder.into(),
            id_strategy,
        });
        self
    }

    pub fn movie_service(&self) -> &dyn MovieService {
        self.movies.as_ref()
    }

    pub fn has_show_service(&self) -> bool {
        self.shows.is_some()
    }

    /// Build the movie payload, failing fast when the quality profile is unset
    pub fn prepare_movie(
        &self,
        entry: &WatchlistEntry,
        tmdb_id: u32,
        profile: &ServiceProfile,
    ) -> Result<MovieAddRequest, AddOutcome> {
        let quality_profile_id = profile
            .quality_profile_id
            .ok_or_else(|| AddOutcome::Rejected(UNRESOLVED_PROFILE.to_string()))?;

        Ok(MovieAddRequest::new(
            entry.title.clone(),
            tmdb_id,
            quality_profile_id,
            self.movie_root_folder.clone(),
        ))
    }

    /// Build the show payload.
    ///
    /// With `ShowIdStrategy::ServiceLookup` this performs the (read-only) series
    /// lookup against the show service to get its native id.
    pub async fn prepare_show(
        &self,
        entry: &WatchlistEntry,
        external_id: u32,
        profile: &ServiceProfile,
    ) -> Result<ShowAddRequest, AddOutcome> {
        let target = self
            .shows
            .as_ref()
            .ok_or_else(|| AddOutcome::Rejected(NO_SHOW_SERVICE.to_string()))?;
        let quality_profile_id = profile
            .quality_profile_id
            .ok_or_else(|| AddOutcome::Rejected(UNRESOLVED_PROFILE.to_string()))?;

        let tvdb_id = match target.id_strategy {
            ShowIdStrategy::Resolver => external_id,
            ShowIdStrategy::ServiceLookup => match target.service.lookup_tvdb_id(&entry.title).await {
                Ok(Some(id)) => {
                    debug!("Series lookup for '{}': {} (resolver had {})", entry.title, id, external_id);
                    id
                }
                Ok(None) => return Err(AddOutcome::Rejected(NO_SERIES_MATCH.to_string())),
                Err(e) => return Err(lookup_failure(e)),
            },
        };

        Ok(ShowAddRequest::new(
            entry.title.clone(),
            tvdb_id,
            quality_profile_id,
            profile.language_profile_id,
            target.root_folder.clone(),
        ))
    }

    pub async fn add_movie(&self, entry: &WatchlistEntry, tmdb_id: u32, profile: &ServiceProfile) -> AddOutcome {
        match self.prepare_movie(entry, tmdb_id, profile) {
            Ok(request) => self.movies.add_movie(&request).await,
            Err(outcome) => outcome,
        }
    }

    pub async fn add_show(&self, entry: &WatchlistEntry, external_id: u32, profile: &ServiceProfile) -> AddOutcome {
        let request = match self.prepare_show(entry, external_id, profile).await {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };
        match &self.shows {
            Some(target) => target.service.add_series(&request).await,
            None => AddOutcome::Rejected(NO_SHOW_SERVICE.to_string()),
        }
    }
}

fn lookup_failure(error: SourceError) -> AddOutcome {
    match error {
        SourceError::Status { reason, .. } => AddOutcome::Rejected(reason),
        error @ SourceError::Transport { .. } => AddOutcome::TransportFailed(error.to_string()),
        other => AddOutcome::Rejected(other.to_string()),
    }
}

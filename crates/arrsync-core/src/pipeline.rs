//! Watchlist reconciliation: fetch, classify, resolve, dispatch.
//!
//! Entries are processed one at a time, in watchlist order. A failure on one
//! entry is recorded and the run moves on; only a failed watchlist fetch aborts.

use arrsync_config::EnvironmentConfig;
use arrsync_models::{AddRequest, EntryOutcome, MediaType, ResolvedIdentifier, ServiceProfile, SkipReason, WatchlistEntry};
use arrsync_sources::{IdentifierResolver, ServiceSet, SourceError, WatchlistSource};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use crate::dispatch::ServiceDispatcher;
use crate::profile::resolve_quality_profile;
use crate::report::{EntryReport, RunReport};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub environment: String,
    pub quality_profile: String,
    pub language_profile_id: u32,
    /// Resolve and build requests, but never POST them
    pub dry_run: bool,
}

impl PipelineSettings {
    pub fn from_environment(environment: &EnvironmentConfig, dry_run: bool) -> Self {
        Self {
            environment: environment.name.clone(),
            quality_profile: environment.radarr.quality_profile.clone(),
            language_profile_id: environment
                .sonarr
                .as_ref()
                .map(|s| s.language_profile_id)
                .unwrap_or(1),
            dry_run,
        }
    }
}

/// Progress hooks for callers that display the run as it happens
pub trait RunObserver: Send + Sync {
    fn on_fetched(&self, _total: usize) {}
    fn on_entry_started(&self, _index: usize, _entry: &WatchlistEntry) {}
    fn on_entry_finished(&self, _index: usize, _entry: &WatchlistEntry, _outcome: &EntryOutcome) {}
}

/// Downstream service an entry is routed to after classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Movie,
    Show,
}

pub struct Pipeline {
    settings: PipelineSettings,
    source: Box<dyn WatchlistSource>,
    resolver: Box<dyn IdentifierResolver>,
    dispatcher: ServiceDispatcher,
    observer: Option<Arc<dyn RunObserver>>,
}

impl Pipeline {
    pub fn new(
        settings: PipelineSettings,
        source: Box<dyn WatchlistSource>,
        resolver: Box<dyn IdentifierResolver>,
        dispatcher: ServiceDispatcher,
    ) -> Self {
        Self {
            settings,
            source,
            resolver,
            dispatcher,
            observer: None,
        }
    }

    /// Wire the adapters built for `environment` into a pipeline
    pub fn from_services(environment: &EnvironmentConfig, services: ServiceSet, dry_run: bool) -> Self {
        let mut dispatcher = ServiceDispatcher::new(services.movies, environment.radarr.root_folder.clone());
        if let (Some(shows), Some(sonarr)) = (services.shows, environment.sonarr.as_ref()) {
            dispatcher = dispatcher.with_shows(shows, sonarr.root_folder.clone(), sonarr.id_strategy);
        }

        Self::new(
            PipelineSettings::from_environment(environment, dry_run),
            services.watchlist,
            services.resolver,
            dispatcher,
        )
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run one full pass over the watchlist.
    ///
    /// Returns `Err` only when the watchlist itself cannot be fetched or parsed;
    /// in that case no entry is processed.
    #[instrument(skip(self), fields(environment = %self.settings.environment, dry_run = self.settings.dry_run))]
    pub async fn run(&self) -> Result<RunReport, SourceError> {
        let started_at = Utc::now();
        let timer = Instant::now();
        info!("Starting watchlist sync for '{}'", self.settings.environment);

        let quality_profile_id =
            resolve_quality_profile(self.dispatcher.movie_service(), &self.settings.quality_profile).await;
        let profile = ServiceProfile::new(quality_profile_id, self.settings.language_profile_id);
        if !profile.is_resolved() {
            warn!(
                "Quality profile '{}' is unresolved; add requests will be rejected",
                self.settings.quality_profile
            );
        }

        let entries = self.source.fetch_watchlist().await?;
        if let Some(observer) = &self.observer {
            observer.on_fetched(entries.len());
        }
        info!("Processing {} watchlist entries from {}", entries.len(), self.source.source_name());

        let mut reports = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            if let Some(observer) = &self.observer {
                observer.on_entry_started(index, &entry);
            }

            let (resolved, outcome) = self.process_entry(&entry, &profile).await;
            log_outcome(&entry, &outcome);

            if let Some(observer) = &self.observer {
                observer.on_entry_finished(index, &entry, &outcome);
            }
            reports.push(EntryReport {
                external_id: resolved.and_then(|r| r.external_id),
                entry,
                outcome,
            });
        }

        let report = RunReport {
            environment: self.settings.environment.clone(),
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
            dry_run: self.settings.dry_run,
            quality_profile_id,
            entries: reports,
        };

        let summary = report.summary();
        info!(
            "Sync for '{}' finished: {} entries, {} added, {} rejected, {} failed, {} not found, {} skipped",
            self.settings.environment,
            summary.total,
            summary.added,
            summary.rejected,
            summary.transport_failed + summary.resolve_failed,
            summary.not_found,
            summary.skipped
        );

        Ok(report)
    }

    fn classify(&self, entry: &WatchlistEntry) -> Result<Route, SkipReason> {
        if !entry.media_type.is_dispatchable() {
            return Err(SkipReason::UnsupportedMediaType);
        }
        match entry.media_type {
            MediaType::Show if self.dispatcher.has_show_service() => Ok(Route::Show),
            MediaType::Show => Err(SkipReason::NoShowService),
            _ => Ok(Route::Movie),
        }
    }

    async fn process_entry(
        &self,
        entry: &WatchlistEntry,
        profile: &ServiceProfile,
    ) -> (Option<ResolvedIdentifier>, EntryOutcome) {
        let route = match self.classify(entry) {
            Ok(route) => route,
            Err(reason) => return (None, EntryOutcome::Skipped { reason }),
        };

        let external_id = match self.resolver.resolve_identifier(&entry.title, entry.media_type).await {
            Ok(id) => id,
            Err(e) => return (None, EntryOutcome::ResolveFailed { reason: e.to_string() }),
        };
        let resolved = ResolvedIdentifier::for_entry(entry, external_id);
        let Some(external_id) = external_id else {
            return (Some(resolved), EntryOutcome::NotFound);
        };

        let outcome = if self.settings.dry_run {
            self.plan(route, entry, external_id, profile).await
        } else {
            let outcome = match route {
                Route::Movie => self.dispatcher.add_movie(entry, external_id, profile).await,
                Route::Show => self.dispatcher.add_show(entry, external_id, profile).await,
            };
            EntryOutcome::dispatched(outcome)
        };

        (Some(resolved), outcome)
    }

    async fn plan(&self, route: Route, entry: &WatchlistEntry, external_id: u32, profile: &ServiceProfile) -> EntryOutcome {
        let request = match route {
            Route::Movie => self
                .dispatcher
                .prepare_movie(entry, external_id, profile)
                .map(AddRequest::Movie),
            Route::Show => self
                .dispatcher
                .prepare_show(entry, external_id, profile)
                .await
                .map(AddRequest::Show),
        };

        match request {
            Ok(request) => EntryOutcome::Planned { request },
            Err(outcome) => EntryOutcome::dispatched(outcome),
        }
    }
}

fn log_outcome(entry: &WatchlistEntry, outcome: &EntryOutcome) {
    if outcome.is_success() {
        info!("'{}' ({}): {}", entry.title, entry.media_type, outcome);
    } else {
        warn!("'{}' ({}): {}", entry.title, entry.media_type, outcome);
    }
}

#[cfg(test)]
mod tests;

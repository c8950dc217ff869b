use super::*;
use arrsync_config::Config;
use arrsync_models::{AddOutcome, MovieAddRequest, QualityProfile, ShowAddRequest, ShowIdStrategy};
use arrsync_sources::{create_services, MovieService, ShowService};
use async_trait::async_trait;
use mockito::Matcher;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use crate::dispatch::UNRESOLVED_PROFILE;

struct FakeSource {
    entries: Vec<WatchlistEntry>,
    malformed: bool,
}

impl FakeSource {
    fn with(entries: Vec<WatchlistEntry>) -> Self {
        Self { entries, malformed: false }
    }
}

#[async_trait]
impl WatchlistSource for FakeSource {
    fn source_name(&self) -> &str {
        "Fake"
    }

    async fn fetch_watchlist(&self) -> Result<Vec<WatchlistEntry>, SourceError> {
        if self.malformed {
            return Err(SourceError::Parse("unclosed tag <MediaContainer>".to_string()));
        }
        Ok(self.entries.clone())
    }
}

/// Known titles resolve, `unreachable` titles fail with a transport error
#[derive(Clone, Default)]
struct FakeResolver {
    ids: HashMap<String, u32>,
    unreachable: HashSet<String>,
    calls: Arc<Mutex<Vec<(String, MediaType)>>>,
}

impl FakeResolver {
    fn knowing(ids: &[(&str, u32)]) -> Self {
        Self {
            ids: ids.iter().map(|(t, id)| (t.to_string(), *id)).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl IdentifierResolver for FakeResolver {
    async fn resolve_identifier(&self, title: &str, media_type: MediaType) -> Result<Option<u32>, SourceError> {
        self.calls.lock().unwrap().push((title.to_string(), media_type));
        if self.unreachable.contains(title) {
            let error = reqwest::Client::new()
                .get("http://127.0.0.1:1/")
                .send()
                .await
                .unwrap_err();
            return Err(SourceError::transport("tmdb", error));
        }
        Ok(self.ids.get(title).copied())
    }
}

/// Behaves like Radarr: a second add of the same tmdb id is rejected
#[derive(Clone)]
struct FakeMovies {
    profiles: Vec<QualityProfile>,
    library: Arc<Mutex<HashSet<u32>>>,
    sent: Arc<Mutex<Vec<MovieAddRequest>>>,
}

impl Default for FakeMovies {
    fn default() -> Self {
        Self {
            profiles: vec![
                QualityProfile { id: 1, name: "Any".to_string() },
                QualityProfile { id: 4, name: "HD-1080p".to_string() },
            ],
            library: Arc::default(),
            sent: Arc::default(),
        }
    }
}

#[async_trait]
impl MovieService for FakeMovies {
    fn service_name(&self) -> &str {
        "Radarr"
    }

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, SourceError> {
        Ok(self.profiles.clone())
    }

    async fn add_movie(&self, request: &MovieAddRequest) -> AddOutcome {
        self.sent.lock().unwrap().push(request.clone());
        if self.library.lock().unwrap().insert(request.tmdb_id) {
            AddOutcome::Added
        } else {
            AddOutcome::Rejected("This movie has already been added".to_string())
        }
    }
}

#[derive(Clone, Default)]
struct FakeShows {
    lookup: Option<u32>,
    lookups: Arc<Mutex<Vec<String>>>,
    sent: Arc<Mutex<Vec<ShowAddRequest>>>,
}

#[async_trait]
impl ShowService for FakeShows {
    fn service_name(&self) -> &str {
        "Sonarr"
    }

    async fn lookup_tvdb_id(&self, term: &str) -> Result<Option<u32>, SourceError> {
        self.lookups.lock().unwrap().push(term.to_string());
        Ok(self.lookup)
    }

    async fn add_series(&self, request: &ShowAddRequest) -> AddOutcome {
        self.sent.lock().unwrap().push(request.clone());
        AddOutcome::Added
    }
}

fn settings(dry_run: bool) -> PipelineSettings {
    PipelineSettings {
        environment: "home".to_string(),
        quality_profile: "HD-1080p".to_string(),
        language_profile_id: 1,
        dry_run,
    }
}

fn movie(title: &str) -> WatchlistEntry {
    WatchlistEntry::new(title, MediaType::Movie)
}

fn show(title: &str) -> WatchlistEntry {
    WatchlistEntry::new(title, MediaType::Show)
}

fn movie_pipeline(entries: Vec<WatchlistEntry>, resolver: FakeResolver, movies: FakeMovies) -> Pipeline {
    Pipeline::new(
        settings(false),
        Box::new(FakeSource::with(entries)),
        Box::new(resolver),
        ServiceDispatcher::new(Box::new(movies), "/media/Movies"),
    )
}

fn full_pipeline(
    entries: Vec<WatchlistEntry>,
    resolver: FakeResolver,
    movies: FakeMovies,
    shows: FakeShows,
    strategy: ShowIdStrategy,
    dry_run: bool,
) -> Pipeline {
    let dispatcher = ServiceDispatcher::new(Box::new(movies), "/media/Movies")
        .with_shows(Box::new(shows), "/media/TV", strategy);
    Pipeline::new(
        settings(dry_run),
        Box::new(FakeSource::with(entries)),
        Box::new(resolver),
        dispatcher,
    )
}

#[tokio::test]
async fn test_movie_is_resolved_and_added() {
    let movies = FakeMovies::default();
    let pipeline = movie_pipeline(vec![movie("Dune")], FakeResolver::knowing(&[("Dune", 438631)]), movies.clone());

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.quality_profile_id, Some(4));
    assert_eq!(report.outcome_for("Dune"), Some(&EntryOutcome::dispatched(AddOutcome::Added)));
    assert_eq!(report.entries[0].external_id, Some(438631));
    let sent = movies.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].tmdb_id, 438631);
    assert_eq!(sent[0].quality_profile_id, 4);
    assert_eq!(sent[0].root_folder_path, "/media/Movies");
}

#[tokio::test]
async fn test_unknown_media_type_is_skipped() {
    let resolver = FakeResolver::knowing(&[("Some Clip", 7)]);
    let movies = FakeMovies::default();
    let pipeline = movie_pipeline(
        vec![WatchlistEntry::new("Some Clip", MediaType::Unknown)],
        resolver.clone(),
        movies.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(
        report.outcome_for("Some Clip"),
        Some(&EntryOutcome::Skipped { reason: SkipReason::UnsupportedMediaType })
    );
    assert!(resolver.calls.lock().unwrap().is_empty());
    assert!(movies.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unresolved_title_is_not_dispatched() {
    let movies = FakeMovies::default();
    let pipeline = movie_pipeline(
        vec![movie("Unknown Obscure Film")],
        FakeResolver::default(),
        movies.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.outcome_for("Unknown Obscure Film"), Some(&EntryOutcome::NotFound));
    assert_eq!(report.entries[0].external_id, None);
    assert!(movies.sent.lock().unwrap().is_empty());
    assert_eq!(report.summary().not_found, 1);
}

#[tokio::test]
async fn test_missing_quality_profile_rejects_every_add() {
    let movies = FakeMovies {
        profiles: vec![QualityProfile { id: 1, name: "Any".to_string() }],
        ..Default::default()
    };
    let pipeline = movie_pipeline(
        vec![movie("Dune"), movie("Arrival")],
        FakeResolver::knowing(&[("Dune", 438631), ("Arrival", 329865)]),
        movies.clone(),
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.quality_profile_id, None);
    assert_eq!(report.entries.len(), 2);
    for entry in &report.entries {
        assert_eq!(
            entry.outcome,
            EntryOutcome::dispatched(AddOutcome::Rejected(UNRESOLVED_PROFILE.to_string()))
        );
    }
    assert!(movies.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_watchlist_aborts_before_dispatch() {
    let resolver = FakeResolver::knowing(&[("Dune", 438631)]);
    let movies = FakeMovies::default();
    let pipeline = Pipeline::new(
        settings(false),
        Box::new(FakeSource { entries: vec![movie("Dune")], malformed: true }),
        Box::new(resolver.clone()),
        ServiceDispatcher::new(Box::new(movies.clone()), "/media/Movies"),
    );

    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(err, SourceError::Parse(_)));
    assert!(resolver.calls.lock().unwrap().is_empty());
    assert!(movies.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_second_run_reports_duplicate() {
    let movies = FakeMovies::default();
    let pipeline = movie_pipeline(vec![movie("Dune")], FakeResolver::knowing(&[("Dune", 438631)]), movies.clone());

    let first = pipeline.run().await.unwrap();
    let second = pipeline.run().await.unwrap();

    assert_eq!(first.outcome_for("Dune"), Some(&EntryOutcome::dispatched(AddOutcome::Added)));
    assert_eq!(
        second.outcome_for("Dune"),
        Some(&EntryOutcome::dispatched(AddOutcome::Rejected(
            "This movie has already been added".to_string()
        )))
    );
    assert_eq!(movies.library.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolver_failure_does_not_stop_the_run() {
    let mut resolver = FakeResolver::knowing(&[("Arrival", 329865)]);
    resolver.unreachable.insert("Dune".to_string());
    let movies = FakeMovies::default();
    let pipeline = movie_pipeline(vec![movie("Dune"), movie("Arrival")], resolver, movies.clone());

    let report = pipeline.run().await.unwrap();

    assert!(matches!(report.outcome_for("Dune"), Some(EntryOutcome::ResolveFailed { .. })));
    assert_eq!(report.outcome_for("Arrival"), Some(&EntryOutcome::dispatched(AddOutcome::Added)));
    assert_eq!(movies.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_show_uses_service_lookup_id() {
    let shows = FakeShows { lookup: Some(371980), ..Default::default() };
    let resolver = FakeResolver::knowing(&[("Severance", 95396)]);
    let pipeline = full_pipeline(
        vec![show("Severance")],
        resolver.clone(),
        FakeMovies::default(),
        shows.clone(),
        ShowIdStrategy::ServiceLookup,
        false,
    );

    let report = pipeline.run().await.unwrap();

    assert_eq!(report.outcome_for("Severance"), Some(&EntryOutcome::dispatched(AddOutcome::Added)));
    assert_eq!(
        *resolver.calls.lock().unwrap(),
        vec![("Severance".to_string(), MediaType::Show)]
    );
    assert_eq!(*shows.lookups.lock().unwrap(), vec!["Severance".to_string()]);
    let sent = shows.sent.lock().unwrap();
    assert_eq!(sent[0], ShowAddRequest::new("Severance", 371980, 4, 1, "/media/TV"));
}

#[tokio::test]
async fn test_show_uses_resolver_id() {
    let shows = FakeShows { lookup: Some(371980), ..Default::default() };
    let pipeline = full_pipeline(
        vec![show("Severance")],
        FakeResolver::knowing(&[("Severance", 95396)]),
        FakeMovies::default(),
        shows.clone(),
        ShowIdStrategy::Resolver,
        false,
    );

    pipeline.run().await.unwrap();

    assert!(shows.lookups.lock().unwrap().is_empty());
    assert_eq!(shows.sent.lock().unwrap()[0].tvdb_id, 95396);
}

#[tokio::test]
async fn test_show_without_show_service_is_skipped() {
    let resolver = FakeResolver::knowing(&[("Severance", 95396), ("Dune", 438631)]);
    let pipeline = movie_pipeline(vec![show("Severance"), movie("Dune")], resolver.clone(), FakeMovies::default());

    let report = pipeline.run().await.unwrap();

    assert_eq!(
        report.outcome_for("Severance"),
        Some(&EntryOutcome::Skipped { reason: SkipReason::NoShowService })
    );
    assert_eq!(report.outcome_for("Dune"), Some(&EntryOutcome::dispatched(AddOutcome::Added)));
    assert_eq!(*resolver.calls.lock().unwrap(), vec![("Dune".to_string(), MediaType::Movie)]);
}

#[tokio::test]
async fn test_dry_run_plans_without_adding() {
    let movies = FakeMovies::default();
    let shows = FakeShows { lookup: Some(371980), ..Default::default() };
    let pipeline = full_pipeline(
        vec![show("Severance"), movie("Dune"), movie("Unknown Obscure Film")],
        FakeResolver::knowing(&[("Severance", 95396), ("Dune", 438631)]),
        movies.clone(),
        shows.clone(),
        ShowIdStrategy::ServiceLookup,
        true,
    );

    let report = pipeline.run().await.unwrap();

    assert!(report.dry_run);
    assert_eq!(
        report.outcome_for("Dune"),
        Some(&EntryOutcome::Planned {
            request: AddRequest::Movie(MovieAddRequest::new("Dune", 438631, 4, "/media/Movies")),
        })
    );
    assert_eq!(
        report.outcome_for("Severance"),
        Some(&EntryOutcome::Planned {
            request: AddRequest::Show(ShowAddRequest::new("Severance", 371980, 4, 1, "/media/TV")),
        })
    );
    assert_eq!(report.outcome_for("Unknown Obscure Film"), Some(&EntryOutcome::NotFound));
    assert_eq!(report.summary().planned, 2);
    assert!(movies.sent.lock().unwrap().is_empty());
    assert!(shows.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_report_preserves_watchlist_order() {
    let entries = vec![show("Severance"), movie("Dune"), movie("Arrival"), show("Andor")];
    let pipeline = full_pipeline(
        entries,
        FakeResolver::knowing(&[("Dune", 438631), ("Arrival", 329865), ("Andor", 83867)]),
        FakeMovies::default(),
        FakeShows { lookup: Some(393189), ..Default::default() },
        ShowIdStrategy::ServiceLookup,
        false,
    );

    let report = pipeline.run().await.unwrap();

    let titles: Vec<&str> = report.entries.iter().map(|r| r.entry.title.as_str()).collect();
    assert_eq!(titles, vec!["Severance", "Dune", "Arrival", "Andor"]);
    assert_eq!(report.outcome_for("Severance"), Some(&EntryOutcome::NotFound));
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RunObserver for RecordingObserver {
    fn on_fetched(&self, total: usize) {
        self.events.lock().unwrap().push(format!("fetched {}", total));
    }

    fn on_entry_started(&self, index: usize, entry: &WatchlistEntry) {
        self.events.lock().unwrap().push(format!("start {} {}", index, entry.title));
    }

    fn on_entry_finished(&self, index: usize, _entry: &WatchlistEntry, outcome: &EntryOutcome) {
        self.events.lock().unwrap().push(format!("done {} {}", index, outcome));
    }
}

#[tokio::test]
async fn test_observer_sees_every_entry() {
    let observer = Arc::new(RecordingObserver::default());
    let pipeline = movie_pipeline(
        vec![movie("Dune"), movie("Unknown Obscure Film")],
        FakeResolver::knowing(&[("Dune", 438631)]),
        FakeMovies::default(),
    )
    .with_observer(observer.clone());

    pipeline.run().await.unwrap();

    assert_eq!(
        *observer.events.lock().unwrap(),
        vec![
            "fetched 2".to_string(),
            "start 0 Dune".to_string(),
            "done 0 added".to_string(),
            "start 1 Unknown Obscure Film".to_string(),
            "done 1 not found".to_string(),
        ]
    );
}

const WATCHLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MediaContainer size="3">
  <Directory title="Severance" type="show"/>
  <Video title="Dune" type="movie"/>
  <Video title="Unknown Obscure Film" type="movie"/>
</MediaContainer>"#;

#[tokio::test]
async fn test_end_to_end_against_http_services() {
    let mut server = mockito::Server::new_async().await;

    let watchlist = server
        .mock("GET", "/library/sections/watchlist/all")
        .match_query(Matcher::UrlEncoded("X-Plex-Token".into(), "plex-token".into()))
        .with_status(200)
        .with_body(WATCHLIST)
        .create_async()
        .await;
    let profiles = server
        .mock("GET", "/api/v3/qualityprofile")
        .match_header("X-Api-Key", "radarr-key")
        .with_status(200)
        .with_body(r#"[{"id":1,"name":"Any"},{"id":4,"name":"HD-1080p"}]"#)
        .create_async()
        .await;
    let dune = server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "Dune".into()))
        .with_status(200)
        .with_body(r#"{"results":[{"id":438631},{"id":841}]}"#)
        .create_async()
        .await;
    let obscure = server
        .mock("GET", "/3/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "Unknown Obscure Film".into()))
        .with_status(200)
        .with_body(r#"{"results":[]}"#)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/api/v3/movie")
        .match_body(Matcher::PartialJson(json!({
            "title": "Dune",
            "tmdbId": 438631,
            "qualityProfileId": 4,
            "rootFolderPath": "/media/Movies",
            "monitored": true,
            "addOptions": { "searchForMovie": true }
        })))
        .with_status(201)
        .with_body(r#"{"id":12}"#)
        .expect(1)
        .create_async()
        .await;

    let mut config = Config::template();
    config.plex.base_url = server.url();
    config.plex.token = "plex-token".to_string();
    config.tmdb.base_url = server.url();
    config.tmdb.api_key = "tmdb-key".to_string();
    let environment = &mut config.environments[0];
    environment.radarr.url = server.url();
    environment.radarr.api_key = "radarr-key".to_string();
    environment.sonarr = None;

    let environment = config.environments[0].clone();
    let services = create_services(&config, &environment).unwrap();
    let report = Pipeline::from_services(&environment, services, false).run().await.unwrap();

    watchlist.assert_async().await;
    profiles.assert_async().await;
    dune.assert_async().await;
    obscure.assert_async().await;
    add.assert_async().await;

    assert_eq!(
        report.outcome_for("Severance"),
        Some(&EntryOutcome::Skipped { reason: SkipReason::NoShowService })
    );
    assert_eq!(report.outcome_for("Dune"), Some(&EntryOutcome::dispatched(AddOutcome::Added)));
    assert_eq!(report.outcome_for("Unknown Obscure Film"), Some(&EntryOutcome::NotFound));
    assert_eq!(report.summary().added, 1);
}

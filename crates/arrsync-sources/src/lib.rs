pub mod arr;
pub mod error;
pub mod factory;
pub mod http;
pub mod plex;
pub mod tmdb;
pub mod traits;

pub use arr::{parse_service_error, RadarrClient, SonarrClient};
pub use error::SourceError;
pub use factory::{create_services, ServiceSet};
pub use plex::PlexWatchlistClient;
pub use tmdb::{MatchPolicy, TmdbClient};
pub use traits::{IdentifierResolver, MovieService, ShowService, WatchlistSource};

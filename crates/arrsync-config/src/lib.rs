pub mod config;
pub mod error;
pub mod paths;
pub mod secrets;

pub use config::{
    Config, EnvironmentConfig, HttpConfig, PlexConfig, RadarrConfig, SonarrConfig, TmdbConfig,
    DEFAULT_PLEX_BASE_URL, DEFAULT_QUALITY_PROFILE, DEFAULT_TMDB_BASE_URL,
};
pub use error::ConfigError;
pub use paths::PathManager;
pub use secrets::apply_secret_overrides;

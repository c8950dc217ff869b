use arrsync_models::ShowIdStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use crate::error::ConfigError;

pub const DEFAULT_PLEX_BASE_URL: &str = "https://metadata.provider.plex.tv";
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org";
pub const DEFAULT_QUALITY_PROFILE: &str = "HD-1080p";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plex: PlexConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// One entry per deployment (base URLs, root folders, profile names).
    /// Every environment runs through the same pipeline.
    #[serde(default)]
    pub environments: Vec<EnvironmentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    #[serde(default = "default_plex_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub radarr: RadarrConfig,
    #[serde(default)]
    pub sonarr: Option<SonarrConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarrConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    pub root_folder: String,
    /// Name of the quality profile to look up at the start of each run
    #[serde(default = "default_quality_profile")]
    pub quality_profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SonarrConfig {
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    pub root_folder: String,
    #[serde(default = "default_language_profile_id")]
    pub language_profile_id: u32,
    #[serde(default)]
    pub id_strategy: ShowIdStrategy,
}

fn default_plex_base_url() -> String {
    DEFAULT_PLEX_BASE_URL.to_string()
}

fn default_tmdb_base_url() -> String {
    DEFAULT_TMDB_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("arrsync/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_quality_profile() -> String {
    DEFAULT_QUALITY_PROFILE.to_string()
}

fn default_language_profile_id() -> u32 {
    1
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            base_url: default_plex_base_url(),
            token: String::new(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            api_key: String::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Starter config written by `config init`
    pub fn template() -> Self {
        Self {
            plex: PlexConfig::default(),
            tmdb: TmdbConfig::default(),
            http: HttpConfig::default(),
            environments: vec![EnvironmentConfig {
                name: "home".to_string(),
                radarr: RadarrConfig {
                    url: "http://localhost:7878".to_string(),
                    api_key: String::new(),
                    root_folder: "/media/Movies".to_string(),
                    quality_profile: default_quality_profile(),
                },
                sonarr: Some(SonarrConfig {
                    url: "http://localhost:8989".to_string(),
                    api_key: String::new(),
                    root_folder: "/media/TV".to_string(),
                    language_profile_id: default_language_profile_id(),
                    id_strategy: ShowIdStrategy::default(),
                }),
            }],
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plex.token.is_empty() {
            return Err(ConfigError::Invalid(
                "Plex token is not configured (set plex.token or PLEX_TOKEN)".to_string(),
            ));
        }
        if self.tmdb.api_key.is_empty() {
            return Err(ConfigError::Invalid(
                "TMDB API key is not configured (set tmdb.api_key or TMDB_API_KEY)".to_string(),
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("http.timeout_seconds must be positive".to_string()));
        }
        if self.environments.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one [[environments]] entry is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for env in &self.environments {
            if env.name.trim().is_empty() {
                return Err(ConfigError::Invalid("Environment name cannot be empty".to_string()));
            }
            if !seen.insert(env.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate environment name: {}",
                    env.name
                )));
            }
            env.validate()?;
        }

        Ok(())
    }

    pub fn environment_names(&self) -> Vec<&str> {
        self.environments.iter().map(|e| e.name.as_str()).collect()
    }

    /// Environments selected by name, in config order. An empty selection means all.
    pub fn select_environments(&self, names: &[String]) -> Result<Vec<&EnvironmentConfig>, ConfigError> {
        if names.is_empty() {
            return Ok(self.environments.iter().collect());
        }

        for name in names {
            if !self.environments.iter().any(|e| &e.name == name) {
                return Err(ConfigError::Invalid(format!(
                    "Unknown environment '{}' (configured: {})",
                    name,
                    self.environment_names().join(", ")
                )));
            }
        }

        Ok(self
            .environments
            .iter()
            .filter(|e| names.contains(&e.name))
            .collect())
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.name;
        if self.radarr.url.is_empty() {
            return Err(ConfigError::Invalid(format!("{}: radarr.url is not configured", name)));
        }
        if self.radarr.api_key.is_empty() {
            return Err(ConfigError::Invalid(format!("{}: radarr.api_key is not configured", name)));
        }
        if self.radarr.root_folder.is_empty() {
            return Err(ConfigError::Invalid(format!("{}: radarr.root_folder is not configured", name)));
        }
        if self.radarr.quality_profile.is_empty() {
            return Err(ConfigError::Invalid(format!("{}: radarr.quality_profile cannot be empty", name)));
        }

        if let Some(sonarr) = &self.sonarr {
            if sonarr.url.is_empty() {
                return Err(ConfigError::Invalid(format!("{}: sonarr.url is not configured", name)));
            }
            if sonarr.api_key.is_empty() {
                return Err(ConfigError::Invalid(format!("{}: sonarr.api_key is not configured", name)));
            }
            if sonarr.root_folder.is_empty() {
                return Err(ConfigError::Invalid(format!("{}: sonarr.root_folder is not configured", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn configured() -> Config {
        let mut config = Config::template();
        config.plex.token = "plex-token".to_string();
        config.tmdb.api_key = "tmdb-key".to_string();
        for env in &mut config.environments {
            env.radarr.api_key = "radarr-key".to_string();
            if let Some(sonarr) = env.sonarr.as_mut() {
                sonarr.api_key = "sonarr-key".to_string();
            }
        }
        config
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = configured();

        config.save_to_file(file.path()).unwrap();
        let loaded = Config::load_from_file(file.path()).unwrap();

        assert_eq!(loaded.plex.token, "plex-token");
        assert_eq!(loaded.environments.len(), 1);
        assert_eq!(loaded.environments[0].radarr.quality_profile, "HD-1080p");
        let sonarr = loaded.environments[0].sonarr.as_ref().unwrap();
        assert_eq!(sonarr.id_strategy, ShowIdStrategy::ServiceLookup);
        assert_eq!(sonarr.language_profile_id, 1);
    }

    #[test]
    fn test_defaults_from_minimal_toml() {
        let config: Config = toml::from_str(
            r#"
            [[environments]]
            name = "niftytv"

            [environments.radarr]
            url = "https://movies.example"
            root_folder = "/media/Movies2"
            "#,
        )
        .unwrap();

        assert_eq!(config.plex.base_url, DEFAULT_PLEX_BASE_URL);
        assert_eq!(config.tmdb.base_url, DEFAULT_TMDB_BASE_URL);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.environments[0].radarr.quality_profile, DEFAULT_QUALITY_PROFILE);
        assert!(config.environments[0].sonarr.is_none());
    }

    #[test]
    fn test_id_strategy_parses() {
        let config: Config = toml::from_str(
            r#"
            [[environments]]
            name = "a"
            [environments.radarr]
            url = "http://r"
            root_folder = "/m"
            [environments.sonarr]
            url = "http://s"
            root_folder = "/t"
            id_strategy = "resolver"
            "#,
        )
        .unwrap();
        let sonarr = config.environments[0].sonarr.as_ref().unwrap();
        assert_eq!(sonarr.id_strategy, ShowIdStrategy::Resolver);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::template();
        assert!(config.validate().is_err());

        config = configured();
        assert!(config.validate().is_ok());

        config.environments[0].radarr.root_folder.clear();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("radarr.root_folder"));
    }

    #[test]
    fn test_validate_rejects_duplicate_environments() {
        let mut config = configured();
        let copy = config.environments[0].clone();
        config.environments.push(copy);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("Duplicate environment name"));
    }

    #[test]
    fn test_select_environments() {
        let mut config = configured();
        let mut second = config.environments[0].clone();
        second.name = "remote".to_string();
        config.environments.push(second);

        assert_eq!(config.select_environments(&[]).unwrap().len(), 2);

        let selected = config.select_environments(&["remote".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "remote");

        assert!(config.select_environments(&["missing".to_string()]).is_err());
    }
}

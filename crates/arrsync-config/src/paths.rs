use crate::error::ConfigError;
use std::path::PathBuf;

/// Container base path from `ARRSYNC_BASE_PATH`, defaulting to "/app"
fn container_base_path() -> PathBuf {
    std::env::var("ARRSYNC_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self, ConfigError> {
        let base_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("arrsync");

        Ok(Self {
            config_dir: base_dir.clone(),
            log_dir: base_dir.join("logs"),
        })
    }

    pub fn from_docker_env() -> Self {
        let base = container_base_path();
        Self {
            config_dir: base.clone(),
            log_dir: base.join("logs"),
        }
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            log_dir: base.join("logs"),
            config_dir: base,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("arrsync.log")
    }

    pub fn env_file(&self) -> PathBuf {
        self.config_dir.join(".env")
    }
}

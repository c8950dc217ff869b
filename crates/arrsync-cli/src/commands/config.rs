use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use arrsync_config::{apply_secret_overrides, Config, PathManager};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Where the config file and its `.env` companion live for this invocation
pub struct ConfigPaths {
    config_file: PathBuf,
    env_file: PathBuf,
    log_file: PathBuf,
}

impl ConfigPaths {
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    /// `--log-file` target: `None` when absent, the default log file when given without a path
    pub fn log_target(&self, arg: Option<Option<PathBuf>>) -> Option<PathBuf> {
        arg.map(|path| path.unwrap_or_else(|| self.log_file.clone()))
    }
}

/// `--config` wins, then `ARRSYNC_BASE_PATH` (containers), then the platform config dir
pub fn resolve_paths(config_override: Option<&Path>) -> Result<ConfigPaths> {
    if let Some(path) = config_override {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let manager = PathManager::with_base(dir);
        return Ok(ConfigPaths {
            config_file: path.to_path_buf(),
            env_file: manager.env_file(),
            log_file: manager.log_file(),
        });
    }

    let manager = if std::env::var_os("ARRSYNC_BASE_PATH").is_some() {
        PathManager::from_docker_env()
    } else {
        PathManager::new().map_err(|e| eyre!("{}", e))?
    };

    Ok(ConfigPaths {
        config_file: manager.config_file(),
        env_file: manager.env_file(),
        log_file: manager.log_file(),
    })
}

/// Load the config file and overlay secrets from the environment
pub fn load_config(paths: &ConfigPaths) -> Result<Config> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        return Err(eyre!(
            "Configuration file not found at {} (run 'arrsync config init' to create one)",
            config_file.display()
        ));
    }

    let mut config = Config::load_from_file(config_file).map_err(|e| eyre!("{}", e))?;
    apply_secret_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

pub fn run_config(cmd: ConfigCommands, paths: &ConfigPaths, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, paths, output),
        ConfigCommands::Init { force } => init_config(force, paths, output),
        ConfigCommands::Path => {
            match output.format() {
                OutputFormat::Human => println!("{}", paths.config_file().display()),
                OutputFormat::Json | OutputFormat::JsonPretty => output.json(&json!({
                    "config_file": paths.config_file().display().to_string(),
                    "env_file": paths.env_file().display().to_string(),
                })),
            }
            Ok(())
        }
    }
}

fn init_config(force: bool, paths: &ConfigPaths, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        return Err(eyre!(
            "Configuration file already exists at {} (use --force to overwrite)",
            config_file.display()
        ));
    }

    Config::template()
        .save_to_file(config_file)
        .map_err(|e| eyre!("{}", e))?;

    output.success(format!("Wrote starter configuration to {}", config_file.display()));
    output.info("Set PLEX_TOKEN, TMDB_API_KEY, RADARR_API_KEY and SONARR_API_KEY (or edit the file) before syncing.");
    Ok(())
}

fn show_config(full: bool, paths: &ConfigPaths, output: &Output) -> Result<()> {
    let config = load_config(paths)?;
    let secret = |s: &str| if full { s.to_string() } else { mask_string(s) };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!("{}\n", paths.config_file().display().dimmed());

            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            table.add_row(vec![Cell::new("plex.base_url"), Cell::new(&config.plex.base_url)]);
            table.add_row(vec![Cell::new("plex.token"), Cell::new(secret(&config.plex.token))]);
            table.add_row(vec![Cell::new("tmdb.base_url"), Cell::new(&config.tmdb.base_url)]);
            table.add_row(vec![Cell::new("tmdb.api_key"), Cell::new(secret(&config.tmdb.api_key))]);
            table.add_row(vec![
                Cell::new("http.timeout_seconds"),
                Cell::new(config.http.timeout_seconds),
            ]);
            println!("{}", table);

            for env in &config.environments {
                let mut env_table = Table::new();
                env_table.load_preset(comfy_table::presets::UTF8_FULL);
                env_table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                env_table.set_header(vec![
                    Cell::new(format!("Environment: {}", env.name))
                        .fg(comfy_table::Color::Cyan)
                        .add_attribute(comfy_table::Attribute::Bold),
                    Cell::new(""),
                ]);
                env_table.add_row(vec![Cell::new("radarr.url"), Cell::new(&env.radarr.url)]);
                env_table.add_row(vec![Cell::new("radarr.api_key"), Cell::new(secret(&env.radarr.api_key))]);
                env_table.add_row(vec![Cell::new("radarr.root_folder"), Cell::new(&env.radarr.root_folder)]);
                env_table.add_row(vec![Cell::new("radarr.quality_profile"), Cell::new(&env.radarr.quality_profile)]);
                match &env.sonarr {
                    Some(sonarr) => {
                        env_table.add_row(vec![Cell::new("sonarr.url"), Cell::new(&sonarr.url)]);
                        env_table.add_row(vec![Cell::new("sonarr.api_key"), Cell::new(secret(&sonarr.api_key))]);
                        env_table.add_row(vec![Cell::new("sonarr.root_folder"), Cell::new(&sonarr.root_folder)]);
                        env_table.add_row(vec![
                            Cell::new("sonarr.language_profile_id"),
                            Cell::new(sonarr.language_profile_id),
                        ]);
                        env_table.add_row(vec![Cell::new("sonarr.id_strategy"), Cell::new(sonarr.id_strategy)]);
                    }
                    None => {
                        env_table.add_row(vec![Cell::new("sonarr"), Cell::new("<not configured>".dimmed())]);
                    }
                }
                println!("\n{}", env_table);
            }

            if let Err(e) = config.validate() {
                println!();
                output.warn(format!("Configuration is incomplete: {}", e));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let environments: Vec<_> = config
                .environments
                .iter()
                .map(|env| {
                    json!({
                        "name": env.name,
                        "radarr": {
                            "url": env.radarr.url,
                            "api_key": secret(&env.radarr.api_key),
                            "root_folder": env.radarr.root_folder,
                            "quality_profile": env.radarr.quality_profile,
                        },
                        "sonarr": env.sonarr.as_ref().map(|sonarr| json!({
                            "url": sonarr.url,
                            "api_key": secret(&sonarr.api_key),
                            "root_folder": sonarr.root_folder,
                            "language_profile_id": sonarr.language_profile_id,
                            "id_strategy": sonarr.id_strategy,
                        })),
                    })
                })
                .collect();

            output.json(&json!({
                "config_file": paths.config_file().display().to_string(),
                "valid": config.validate().is_ok(),
                "plex": {
                    "base_url": config.plex.base_url,
                    "token": secret(&config.plex.token),
                },
                "tmdb": {
                    "base_url": config.tmdb.base_url,
                    "api_key": secret(&config.tmdb.api_key),
                },
                "http": {
                    "timeout_seconds": config.http.timeout_seconds,
                    "user_agent": config.http.user_agent,
                },
                "environments": environments,
            }));
        }
    }

    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

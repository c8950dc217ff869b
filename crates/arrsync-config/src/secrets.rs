use crate::config::Config;
use tracing::debug;

/// Overlay secrets from the process environment.
///
/// `PLEX_TOKEN` and `TMDB_API_KEY` replace the file values when set.
/// For each environment, `ARRSYNC_<NAME>_RADARR_API_KEY` / `ARRSYNC_<NAME>_SONARR_API_KEY`
/// win over the file, and the global `RADARR_API_KEY` / `SONARR_API_KEY` only fill
/// keys that are still empty.
pub fn apply_secret_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(token) = lookup("PLEX_TOKEN") {
        debug!("Using Plex token from PLEX_TOKEN");
        config.plex.token = token;
    }
    if let Some(key) = lookup("TMDB_API_KEY") {
        debug!("Using TMDB API key from TMDB_API_KEY");
        config.tmdb.api_key = key;
    }

    let global_radarr = lookup("RADARR_API_KEY");
    let global_sonarr = lookup("SONARR_API_KEY");

    for env in &mut config.environments {
        let prefix = env_var_prefix(&env.name);

        if let Some(key) = lookup(&format!("{}_RADARR_API_KEY", prefix)) {
            env.radarr.api_key = key;
        } else if env.radarr.api_key.is_empty() {
            if let Some(key) = &global_radarr {
                env.radarr.api_key = key.clone();
            }
        }

        if let Some(sonarr) = env.sonarr.as_mut() {
            if let Some(key) = lookup(&format!("{}_SONARR_API_KEY", prefix)) {
                sonarr.api_key = key;
            } else if sonarr.api_key.is_empty() {
                if let Some(key) = &global_sonarr {
                    sonarr.api_key = key.clone();
                }
            }
        }
    }
}

/// `ARRSYNC_` followed by the environment name upper-cased, non-alphanumerics as `_`
pub fn env_var_prefix(environment: &str) -> String {
    let name: String = environment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("ARRSYNC_{}", name)
}

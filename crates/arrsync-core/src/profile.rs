use arrsync_sources::MovieService;
use tracing::{debug, warn};

/// Look up the id of the quality profile named `profile_name` (exact, case-sensitive).
///
/// Returns `None` when the listing fails or has no such profile. A missing profile
/// is not fatal: the run continues and every add fails per entry.
pub async fn resolve_quality_profile(movies: &dyn MovieService, profile_name: &str) -> Option<u32> {
    let profiles = match movies.quality_profiles().await {
        Ok(profiles) => profiles,
        Err(e) => {
            warn!("Failed to retrieve quality profiles from {}: {}", movies.service_name(), e);
            return None;
        }
    };

    match profiles.iter().find(|p| p.name == profile_name) {
        Some(profile) => {
            debug!("Quality profile '{}' -> {}", profile_name, profile.id);
            Some(profile.id)
        }
        None => {
            warn!(
                "Quality profile '{}' not found in {} (available: {})",
                profile_name,
                movies.service_name(),
                profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
            );
            None
        }
    }
}

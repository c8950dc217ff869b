use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the show service's `tvdbId` comes from.
///
/// The metadata search returns TMDB ids while the show service expects TVDB ids,
/// so `ServiceLookup` asks the show service itself and is the default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShowIdStrategy {
    /// Use the identifier returned by the metadata search as-is
    Resolver,
    /// Re-resolve through the show service's series lookup, first result wins
    #[default]
    ServiceLookup,
}

impl fmt::Display for ShowIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowIdStrategy::Resolver => write!(f, "resolver"),
            ShowIdStrategy::ServiceLookup => write!(f, "service_lookup"),
        }
    }
}

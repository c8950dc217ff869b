use serde::{Deserialize, Serialize};
use std::fmt;

/// Media type of a watchlist entry, as classified from the provider's `type` attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
    Unknown,
}

impl MediaType {
    /// Map a Plex `type` attribute to a media type.
    ///
    /// Matching is exact: `"movie"` and `"show"` are recognized, everything else
    /// (including a missing attribute) is `Unknown`.
    pub fn from_plex_type(value: Option<&str>) -> Self {
        match value {
            Some("movie") => MediaType::Movie,
            Some("show") => MediaType::Show,
            _ => MediaType::Unknown,
        }
    }

    /// Whether the pipeline knows a downstream service for this type
    pub fn is_dispatchable(&self) -> bool {
        matches!(self, MediaType::Movie | MediaType::Show)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Show => write!(f, "show"),
            MediaType::Unknown => write!(f, "unknown"),
        }
    }
}

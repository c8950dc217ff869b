use serde::{Deserialize, Serialize};
use crate::media::MediaType;

/// A single title from the user's watchlist, scoped to one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub title: String,
    pub media_type: MediaType,
}

impl WatchlistEntry {
    pub fn new(title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            title: title.into(),
            media_type,
        }
    }
}

/// Result of running an entry through the identifier resolver.
///
/// `external_id == None` is terminal: no downstream call is made for the entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedIdentifier {
    pub source_title: String,
    pub media_type: MediaType,
    pub external_id: Option<u32>,
}

impl ResolvedIdentifier {
    pub fn for_entry(entry: &WatchlistEntry, external_id: Option<u32>) -> Self {
        Self {
            source_title: entry.title.clone(),
            media_type: entry.media_type,
            external_id,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Quality profile as listed by the movie service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityProfile {
    pub id: u32,
    pub name: String,
}

/// Profile identifiers shared by every add request in a run.
///
/// Produced once per run and passed explicitly to the dispatcher.
/// `quality_profile_id` is `None` when the named profile could not be resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceProfile {
    pub quality_profile_id: Option<u32>,
    pub language_profile_id: u32,
}

impl ServiceProfile {
    pub fn new(quality_profile_id: Option<u32>, language_profile_id: u32) -> Self {
        Self {
            quality_profile_id,
            language_profile_id,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.quality_profile_id.is_some()
    }
}

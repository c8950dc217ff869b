use serde::{Deserialize, Serialize};

/// Payload for `POST /api/v3/movie`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovieAddRequest {
    pub title: String,
    pub quality_profile_id: u32,
    pub tmdb_id: u32,
    pub root_folder_path: String,
    pub monitored: bool,
    pub add_options: MovieAddOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MovieAddOptions {
    pub search_for_movie: bool,
}

impl MovieAddRequest {
    /// Monitored, with an immediate search once added
    pub fn new(title: impl Into<String>, tmdb_id: u32, quality_profile_id: u32, root_folder_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            quality_profile_id,
            tmdb_id,
            root_folder_path: root_folder_path.into(),
            monitored: true,
            add_options: MovieAddOptions { search_for_movie: true },
        }
    }
}

/// Payload for `POST /api/v3/series`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShowAddRequest {
    pub title: String,
    pub quality_profile_id: u32,
    pub language_profile_id: u32,
    pub tvdb_id: u32,
    pub root_folder_path: String,
    pub monitored: bool,
    pub add_options: ShowAddOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShowAddOptions {
    pub search_for_missing_episodes: bool,
}

impl ShowAddRequest {
    /// Monitored, searching for missing episodes once added
    pub fn new(
        title: impl Into<String>,
        tvdb_id: u32,
        quality_profile_id: u32,
        language_profile_id: u32,
        root_folder_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            quality_profile_id,
            language_profile_id,
            tvdb_id,
            root_folder_path: root_folder_path.into(),
            monitored: true,
            add_options: ShowAddOptions { search_for_missing_episodes: true },
        }
    }
}

/// Either add request, as recorded in dry-run reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "service", rename_all = "lowercase")]
pub enum AddRequest {
    Movie(MovieAddRequest),
    Show(ShowAddRequest),
}

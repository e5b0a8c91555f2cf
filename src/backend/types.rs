use serde::{Deserialize, Serialize};

// Wire schemas for the three backend endpoints. Field names follow the
// backend's JSON contract, not Rust conventions.

#[derive(Debug, Clone, Serialize)]
pub struct DetectRequest {
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectResponse {
    pub emotion: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendRequest {
    pub emotion: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendResponse {
    /// Fenced structured text mapping language names to song lists.
    pub songs: Option<String>,
    pub error: Option<String>,
}

/// One song/artist pair requested for enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongRequest {
    pub song: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichRequest {
    #[serde(rename = "musicList")]
    pub music_list: Vec<SongRequest>,
}

/// A recommendation augmented with display metadata by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichedSong {
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, rename = "spotifyLink")]
    pub spotify_link: Option<String>,
}

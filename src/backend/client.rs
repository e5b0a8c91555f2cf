use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::types::{
    DetectRequest, DetectResponse, EnrichRequest, EnrichedSong, RecommendRequest,
    RecommendResponse, SongRequest,
};
use crate::config::BackendSettings;
use crate::error::AppError;

pub const DETECT_ENDPOINT: &str = "/detect-emotion";
pub const RECOMMEND_ENDPOINT: &str = "/recommend-music";
pub const ENRICH_ENDPOINT: &str = "/enrich-music-data";

/// The application's only network boundary. Implementations perform the three
/// remote operations the recommendation pipeline runs in sequence.
#[async_trait]
pub trait MusicBackend: Send + Sync {
    /// Sends an encoded still image, returns the detected emotion label.
    async fn detect_emotion(&self, image: &str) -> Result<String, AppError>;

    /// Sends an emotion label, returns the raw (possibly fenced) song text.
    async fn recommend_music(&self, emotion: &str) -> Result<String, AppError>;

    /// Sends parsed song requests, returns the enriched playlist.
    async fn enrich_music_data(
        &self,
        songs: &[SongRequest],
    ) -> Result<Vec<EnrichedSong>, AppError>;
}

/// HTTP client for the emotion/recommendation backend.
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::remote("backend", e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<Req, Resp>(&self, endpoint: &'static str, body: &Req) -> Result<Resp, AppError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(url = %url, "Calling backend");

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::remote(endpoint, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::remote(
                endpoint,
                format!("status {}: {}", status.as_u16(), error_text),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl MusicBackend for BackendClient {
    async fn detect_emotion(&self, image: &str) -> Result<String, AppError> {
        let request = DetectRequest {
            image: image.to_string(),
        };
        let response: DetectResponse = self.post(DETECT_ENDPOINT, &request).await?;

        if let Some(error) = response.error {
            return Err(AppError::remote(DETECT_ENDPOINT, error));
        }
        response
            .emotion
            .ok_or_else(|| AppError::malformed(DETECT_ENDPOINT, "missing emotion field"))
    }

    async fn recommend_music(&self, emotion: &str) -> Result<String, AppError> {
        let request = RecommendRequest {
            emotion: emotion.to_string(),
        };
        let response: RecommendResponse = self.post(RECOMMEND_ENDPOINT, &request).await?;

        if let Some(error) = response.error {
            return Err(AppError::remote(RECOMMEND_ENDPOINT, error));
        }
        response
            .songs
            .ok_or_else(|| AppError::malformed(RECOMMEND_ENDPOINT, "missing songs field"))
    }

    async fn enrich_music_data(
        &self,
        songs: &[SongRequest],
    ) -> Result<Vec<EnrichedSong>, AppError> {
        let request = EnrichRequest {
            music_list: songs.to_vec(),
        };
        self.post(ENRICH_ENDPOINT, &request).await
    }
}

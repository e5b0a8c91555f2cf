use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::backend::client::MusicBackend;
use crate::error::AppError;
use crate::pipeline::context::{SessionContext, StageType};
use crate::pipeline::normalize;
use crate::pipeline::step::ProcessingStep;

/// Stage 3: turns the flat song list into structured requests, fetches the
/// enriched metadata, and stores the playlist whole. A failure here leaves
/// the context's playlist empty; partial enrichment is never exposed.
pub struct EnrichMusicStep {
    backend: Arc<dyn MusicBackend>,
}

impl EnrichMusicStep {
    pub fn new(backend: Arc<dyn MusicBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ProcessingStep for EnrichMusicStep {
    async fn process(&mut self, context: &mut SessionContext) -> Result<(), AppError> {
        let step_start = Instant::now();

        if context.raw_recommendations.is_none() {
            return Err(AppError::Pipeline(
                "enrich stage ran before recommendations arrived".to_string(),
            ));
        }

        let requests = normalize::parse_song_requests(&context.flat_songs);
        let playlist = self.backend.enrich_music_data(&requests).await?;
        info!(
            session = %context.id,
            requested = requests.len(),
            enriched = playlist.len(),
            "Playlist enriched"
        );
        context.playlist = playlist;

        context
            .metrics
            .record_duration(StageType::Enrich, step_start.elapsed().as_micros() as u64);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "EnrichMusicStep"
    }
}

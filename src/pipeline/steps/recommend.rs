use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::backend::client::MusicBackend;
use crate::error::AppError;
use crate::pipeline::context::{SessionContext, StageType};
use crate::pipeline::normalize;
use crate::pipeline::step::ProcessingStep;

/// Stage 2: asks the backend for recommendations matching the detected
/// emotion, keeps the raw reply, and flattens it into display strings.
pub struct RecommendMusicStep {
    backend: Arc<dyn MusicBackend>,
}

impl RecommendMusicStep {
    pub fn new(backend: Arc<dyn MusicBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ProcessingStep for RecommendMusicStep {
    async fn process(&mut self, context: &mut SessionContext) -> Result<(), AppError> {
        let step_start = Instant::now();

        let emotion = context.emotion.clone().ok_or_else(|| {
            AppError::Pipeline("recommend stage ran before an emotion was detected".to_string())
        })?;
        let raw = self.backend.recommend_music(&emotion).await?;
        let flat_songs = normalize::flatten_recommendations(&raw)?;
        info!(
            session = %context.id,
            songs = flat_songs.len(),
            "Recommendations flattened"
        );
        context.raw_recommendations = Some(raw);
        context.flat_songs = flat_songs;

        context.metrics.record_duration(
            StageType::Recommend,
            step_start.elapsed().as_micros() as u64,
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecommendMusicStep"
    }
}

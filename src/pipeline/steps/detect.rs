use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::backend::client::MusicBackend;
use crate::error::AppError;
use crate::pipeline::context::{SessionContext, StageType};
use crate::pipeline::step::ProcessingStep;

/// Stage 1: sends the captured still to the backend and records the detected
/// emotion label on the context.
pub struct DetectEmotionStep {
    backend: Arc<dyn MusicBackend>,
}

impl DetectEmotionStep {
    pub fn new(backend: Arc<dyn MusicBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ProcessingStep for DetectEmotionStep {
    async fn process(&mut self, context: &mut SessionContext) -> Result<(), AppError> {
        let step_start = Instant::now();

        let emotion = self.backend.detect_emotion(&context.still.data_url).await?;
        info!(session = %context.id, emotion = %emotion, "Emotion detected");
        context.emotion = Some(emotion);

        context
            .metrics
            .record_duration(StageType::Detect, step_start.elapsed().as_micros() as u64);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "DetectEmotionStep"
    }
}

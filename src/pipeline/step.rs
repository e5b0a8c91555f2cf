use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::backend::client::MusicBackend;
use crate::error::AppError;
use crate::pipeline::context::{SessionContext, SessionSnapshot};
use crate::pipeline::steps::{DetectEmotionStep, EnrichMusicStep, RecommendMusicStep};

/// Chain of Responsibility over the remote stages of a recommendation run.
#[async_trait]
pub trait ProcessingStep: Send + Sync {
    async fn process(&mut self, context: &mut SessionContext) -> Result<(), AppError>;
    fn name(&self) -> &'static str;
}

/// Runs its steps strictly in order; the first failure aborts the run, so no
/// later stage ever executes after an earlier one fails. After each completed
/// step a snapshot is emitted on the optional progress channel so the UI can
/// show intermediate values.
pub struct RecommendationPipeline {
    steps: Vec<Box<dyn ProcessingStep>>,
    progress_tx: Option<mpsc::Sender<SessionSnapshot>>,
}

impl RecommendationPipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            progress_tx: None,
        }
    }

    /// The standard three-stage run: detect, recommend, enrich.
    pub fn for_backend(backend: Arc<dyn MusicBackend>) -> Self {
        Self::new()
            .add_step(Box::new(DetectEmotionStep::new(backend.clone())))
            .add_step(Box::new(RecommendMusicStep::new(backend.clone())))
            .add_step(Box::new(EnrichMusicStep::new(backend)))
    }

    pub fn add_step(mut self, step: Box<dyn ProcessingStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_progress(mut self, progress_tx: mpsc::Sender<SessionSnapshot>) -> Self {
        self.progress_tx = Some(progress_tx);
        self
    }

    pub async fn process(
        &mut self,
        mut context: SessionContext,
    ) -> Result<SessionContext, AppError> {
        for step in &mut self.steps {
            tracing::debug!("Processing step: {}", step.name());
            step.process(&mut context).await?;
            if let Some(progress_tx) = &self.progress_tx {
                let _ = progress_tx.send(context.snapshot()).await;
            }
        }
        context.metrics.finalize(context.started);
        Ok(context)
    }
}

impl Default for RecommendationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use image::RgbImage;

    use super::*;
    use crate::backend::types::{EnrichedSong, SongRequest};
    use crate::camera::still::StillImage;

    const FENCED_TWO_SONGS: &str = "```json\n{\"English\": [{\"song\": \"Happy\", \"artist\": \"Pharrell Williams\"}, {\"song\": \"Good Life\", \"artist\": \"OneRepublic\"}]}\n```";

    /// Scripted backend double; records call order and fails any stage whose
    /// reply is left unset.
    struct ScriptedBackend {
        emotion: Option<String>,
        songs: Option<String>,
        playlist: Option<Vec<EnrichedSong>>,
        calls: Mutex<Vec<&'static str>>,
        enrich_requests: Mutex<Vec<SongRequest>>,
    }

    impl ScriptedBackend {
        fn new(
            emotion: Option<&str>,
            songs: Option<&str>,
            playlist: Option<Vec<EnrichedSong>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                emotion: emotion.map(str::to_string),
                songs: songs.map(str::to_string),
                playlist,
                calls: Mutex::new(Vec::new()),
                enrich_requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MusicBackend for ScriptedBackend {
        async fn detect_emotion(&self, _image: &str) -> Result<String, AppError> {
            self.calls.lock().unwrap().push("detect");
            self.emotion
                .clone()
                .ok_or_else(|| AppError::remote("/detect-emotion", "scripted failure"))
        }

        async fn recommend_music(&self, _emotion: &str) -> Result<String, AppError> {
            self.calls.lock().unwrap().push("recommend");
            self.songs
                .clone()
                .ok_or_else(|| AppError::remote("/recommend-music", "scripted failure"))
        }

        async fn enrich_music_data(
            &self,
            songs: &[SongRequest],
        ) -> Result<Vec<EnrichedSong>, AppError> {
            self.calls.lock().unwrap().push("enrich");
            self.enrich_requests.lock().unwrap().extend_from_slice(songs);
            self.playlist
                .clone()
                .ok_or_else(|| AppError::remote("/enrich-music-data", "scripted failure"))
        }
    }

    fn enriched(name: &str, artist: &str, link: Option<&str>) -> EnrichedSong {
        EnrichedSong {
            name: name.to_string(),
            artist: artist.to_string(),
            cover: None,
            spotify_link: link.map(str::to_string),
        }
    }

    fn test_context() -> SessionContext {
        let still = StillImage::from_rgb(RgbImage::new(4, 4)).unwrap();
        SessionContext::new(still)
    }

    #[tokio::test]
    async fn happy_path_runs_all_three_stages_in_order() {
        let playlist = vec![
            enriched("Happy", "Pharrell Williams", Some("https://open.spotify.com/track/a")),
            enriched("Good Life", "OneRepublic", None),
        ];
        let backend = ScriptedBackend::new(Some("happy"), Some(FENCED_TWO_SONGS), Some(playlist));
        let mut pipeline = RecommendationPipeline::for_backend(backend.clone());

        let context = pipeline.process(test_context()).await.unwrap();

        assert_eq!(backend.calls(), vec!["detect", "recommend", "enrich"]);
        assert_eq!(context.emotion.as_deref(), Some("happy"));
        assert_eq!(
            context.flat_songs,
            vec!["Happy by Pharrell Williams", "Good Life by OneRepublic"]
        );
        assert_eq!(context.playlist.len(), 2);

        let requests = backend.enrich_requests.lock().unwrap().clone();
        assert_eq!(requests[0].song, "Happy");
        assert_eq!(requests[0].artists, vec!["Pharrell Williams"]);
    }

    #[tokio::test]
    async fn detect_failure_stops_the_run_before_later_stages() {
        let backend = ScriptedBackend::new(None, Some(FENCED_TWO_SONGS), Some(Vec::new()));
        let (progress_tx, mut progress_rx) = mpsc::channel(8);
        let mut pipeline =
            RecommendationPipeline::for_backend(backend.clone()).with_progress(progress_tx);

        let err = pipeline.process(test_context()).await.unwrap_err();

        assert!(matches!(err, AppError::RemoteCallFailed { .. }));
        assert_eq!(backend.calls(), vec!["detect"]);
        // No snapshot was emitted, so the UI never saw a partial update.
        drop(pipeline);
        assert!(progress_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_songs_payload_fails_cleanly_after_detect() {
        let backend = ScriptedBackend::new(Some("sad"), Some("not a mapping"), Some(Vec::new()));
        let (progress_tx, mut progress_rx) = mpsc::channel(8);
        let mut pipeline =
            RecommendationPipeline::for_backend(backend.clone()).with_progress(progress_tx);

        let err = pipeline.process(test_context()).await.unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert_eq!(backend.calls(), vec!["detect", "recommend"]);

        // Only the detect snapshot went out; it carries no song state.
        drop(pipeline);
        let snapshot = progress_rx.try_recv().unwrap();
        assert_eq!(snapshot.emotion.as_deref(), Some("sad"));
        assert!(snapshot.recommendations.is_empty());
        assert!(snapshot.playlist.is_empty());
        assert!(progress_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn progress_snapshots_arrive_per_stage() {
        let playlist = vec![enriched("Happy", "Pharrell Williams", None)];
        let backend = ScriptedBackend::new(Some("happy"), Some(FENCED_TWO_SONGS), Some(playlist));
        let (progress_tx, mut progress_rx) = mpsc::channel(8);
        let mut pipeline =
            RecommendationPipeline::for_backend(backend).with_progress(progress_tx);

        pipeline.process(test_context()).await.unwrap();
        drop(pipeline);

        let mut snapshots = Vec::new();
        while let Ok(snapshot) = progress_rx.try_recv() {
            snapshots.push(snapshot);
        }
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots[0].recommendations.is_empty());
        assert_eq!(snapshots[1].recommendations.len(), 2);
        assert_eq!(snapshots[2].playlist.len(), 1);
    }
}

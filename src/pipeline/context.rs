use std::time::Instant;

use uuid::Uuid;

use crate::backend::types::EnrichedSong;
use crate::camera::still::StillImage;

/// Context object that flows through the recommendation pipeline. Holds the
/// captured still and everything the stages accumulate for a single run.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub still: StillImage,
    pub id: Uuid,
    pub emotion: Option<String>,
    pub raw_recommendations: Option<String>,
    pub flat_songs: Vec<String>,
    pub playlist: Vec<EnrichedSong>,
    pub metrics: StageMetrics,
    pub started: Instant,
}

impl SessionContext {
    pub fn new(still: StillImage) -> Self {
        Self {
            still,
            id: Uuid::new_v4(),
            emotion: None,
            raw_recommendations: None,
            flat_songs: Vec::new(),
            playlist: Vec::new(),
            metrics: StageMetrics::new(),
            started: Instant::now(),
        }
    }

    /// Display-facing view of the run so far, emitted after each stage.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            emotion: self.emotion.clone(),
            recommendations: self.flat_songs.clone(),
            playlist: self.playlist.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionSnapshot {
    pub emotion: Option<String>,
    pub recommendations: Vec<String>,
    pub playlist: Vec<EnrichedSong>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageType {
    Detect,
    Recommend,
    Enrich,
}

/// Timings collected while a session runs through the stages.
#[derive(Debug, Clone, Default)]
pub struct StageMetrics {
    pub detect_duration_us: u64,
    pub recommend_duration_us: u64,
    pub enrich_duration_us: u64,
    pub total_duration_us: u64,
}

impl StageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_duration(&mut self, stage: StageType, duration_us: u64) {
        match stage {
            StageType::Detect => self.detect_duration_us = duration_us,
            StageType::Recommend => self.recommend_duration_us = duration_us,
            StageType::Enrich => self.enrich_duration_us = duration_us,
        }
    }

    pub fn finalize(&mut self, start_time: Instant) {
        self.total_duration_us = start_time.elapsed().as_micros() as u64;
    }
}

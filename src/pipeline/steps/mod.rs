mod detect;
mod enrich;
mod recommend;

pub use detect::DetectEmotionStep;
pub use enrich::EnrichMusicStep;
pub use recommend::RecommendMusicStep;

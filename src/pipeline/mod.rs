pub mod context;
pub mod normalize;
pub mod step;
pub mod steps;

pub use context::{SessionContext, SessionSnapshot, StageMetrics, StageType};
pub use step::{ProcessingStep, RecommendationPipeline};

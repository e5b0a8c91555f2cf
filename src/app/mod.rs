pub mod moodtunes_app;
pub mod state;
pub mod views;

pub use moodtunes_app::MoodTunesApp;
pub use state::{CaptureState, SessionState, UiUpdate};

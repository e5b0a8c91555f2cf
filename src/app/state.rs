use crate::backend::types::EnrichedSong;
use crate::camera::still::StillImage;
use crate::error::AppError;
use crate::location::UserLocation;
use crate::pipeline::context::SessionSnapshot;

/// Where the capture flow currently is. At most one still exists at a time.
pub enum CaptureState {
    Idle,
    Streaming,
    Captured(StillImage),
}

impl CaptureState {
    pub fn still(&self) -> Option<&StillImage> {
        match self {
            CaptureState::Captured(still) => Some(still),
            _ => None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, CaptureState::Streaming)
    }
}

/// Messages the background tasks send to the UI thread.
pub enum UiUpdate {
    Location(UserLocation),
    Session(SessionSnapshot),
    PipelineFinished { error: Option<AppError> },
}

/// The single UI-owned state object. Mutated only on the UI thread, from
/// `UiUpdate` messages and direct user actions.
pub struct SessionState {
    pub capture: CaptureState,
    pub emotion: Option<String>,
    pub recommendations: Vec<String>,
    pub playlist: Vec<EnrichedSong>,
    pub location: Option<UserLocation>,
    pub loading: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            capture: CaptureState::Idle,
            emotion: None,
            recommendations: Vec::new(),
            playlist: Vec::new(),
            location: None,
            loading: false,
        }
    }

    /// Keep-until-replaced: prior results stay visible while a new run is
    /// pending and are overwritten only as the new stage snapshots arrive.
    pub fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        if let Some(emotion) = snapshot.emotion {
            self.emotion = Some(emotion);
        }
        if !snapshot.recommendations.is_empty() {
            self.recommendations = snapshot.recommendations;
        }
        if !snapshot.playlist.is_empty() {
            self.playlist = snapshot.playlist;
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

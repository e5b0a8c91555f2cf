use moodtunes::app::MoodTunesApp;
use moodtunes::config::Settings;
use moodtunes::error::AppError;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let settings = Settings::load()?;
    MoodTunesApp::start_gui(settings)
}

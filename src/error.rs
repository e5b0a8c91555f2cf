use thiserror::Error;

// Main application error type.

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Remote call to {endpoint} failed: {message}")]
    RemoteCallFailed {
        endpoint: &'static str,
        message: String,
    },
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponse {
        endpoint: &'static str,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Image encoding failed: {0}")]
    Encode(String),
    #[error("Pipeline error: {0}")]
    Pipeline(String),
    #[error("UI error: {0}")]
    Ui(String),
}

impl AppError {
    pub fn remote(endpoint: &'static str, message: impl Into<String>) -> Self {
        AppError::RemoteCallFailed {
            endpoint,
            message: message.into(),
        }
    }

    pub fn malformed(endpoint: &'static str, message: impl Into<String>) -> Self {
        AppError::MalformedResponse {
            endpoint,
            message: message.into(),
        }
    }
}

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::LocationSettings;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Best-effort, one-shot coordinates lookup at startup. A failure is logged
/// and never retried; the UI simply omits the location badge.
pub struct LocationProbe {
    http_client: reqwest::Client,
    endpoint: String,
}

impl LocationProbe {
    pub fn new(settings: &LocationSettings) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::remote("location", e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub async fn probe(&self) -> Option<UserLocation> {
        match self.fetch().await {
            Ok(location) => {
                info!(
                    latitude = location.latitude,
                    longitude = location.longitude,
                    "Location resolved"
                );
                Some(location)
            }
            Err(e) => {
                warn!("Location probe failed: {}", e);
                None
            }
        }
    }

    async fn fetch(&self) -> Result<UserLocation, AppError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| AppError::remote("location", e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::remote(
                "location",
                format!("status {}", status.as_u16()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::malformed("location", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> LocationSettings {
        LocationSettings {
            enabled: true,
            endpoint: endpoint.to_string(),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_none() {
        // Port 9 (discard) is refused locally; no network needed.
        let probe = LocationProbe::new(&settings("http://127.0.0.1:9/json")).unwrap();
        assert!(probe.probe().await.is_none());
    }

    #[tokio::test]
    async fn invalid_endpoint_yields_none() {
        let probe = LocationProbe::new(&settings("not-a-url")).unwrap();
        assert!(probe.probe().await.is_none());
    }
}

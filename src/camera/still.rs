use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbImage};
use uuid::Uuid;

use crate::error::AppError;

/// The session's single still frame: the raw pixels for display plus the
/// PNG-in-base64 data URL the backend expects.
#[derive(Debug, Clone)]
pub struct StillImage {
    pub id: Uuid,
    pub rgb: RgbImage,
    pub data_url: String,
    pub captured_at: DateTime<Utc>,
}

impl StillImage {
    pub fn from_rgb(rgb: RgbImage) -> Result<Self, AppError> {
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(rgb.clone())
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| AppError::Encode(e.to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            rgb,
            data_url: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
            captured_at: Utc::now(),
        })
    }

    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    pub fn height(&self) -> u32 {
        self.rgb.height()
    }
}

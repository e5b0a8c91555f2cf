use std::thread;
use std::time::{Duration, Instant};

use image::RgbImage;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::camera::still::StillImage;
use crate::config::CameraSettings;
use crate::error::AppError;

pub enum CameraEvent {
    /// The fixed delay elapsed; the device has already been released.
    Captured(StillImage),
    /// Device acquisition or streaming failed; the flow halts until retried.
    Error(AppError),
}

/// Seam between the capture loop and the device so the loop can be driven
/// without hardware. `stop` releases the underlying stream.
trait FrameSource {
    fn frame(&mut self) -> Result<RgbImage, AppError>;
    fn stop(&mut self) -> Result<(), AppError>;
}

struct NokhwaSource {
    camera: Camera,
}

impl NokhwaSource {
    fn open(settings: &CameraSettings) -> Result<Self, AppError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(settings.index), requested)
            .map_err(|e| AppError::DeviceUnavailable(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| AppError::DeviceUnavailable(e.to_string()))?;

        let resolution = camera.resolution();
        info!(
            width = resolution.width(),
            height = resolution.height(),
            "Camera stream open"
        );
        Ok(Self { camera })
    }
}

impl FrameSource for NokhwaSource {
    fn frame(&mut self) -> Result<RgbImage, AppError> {
        let frame = self
            .camera
            .frame()
            .map_err(|e| AppError::DeviceUnavailable(e.to_string()))?;
        frame
            .decode_image::<RgbFormat>()
            .map_err(|e| AppError::DeviceUnavailable(e.to_string()))
    }

    fn stop(&mut self) -> Result<(), AppError> {
        self.camera
            .stop_stream()
            .map_err(|e| AppError::DeviceUnavailable(e.to_string()))
    }
}

/// Owns the capture worker thread. The worker streams preview frames until the
/// capture delay elapses, then encodes one still and releases the device.
///
/// Capture handles are not `Send` on every platform, so all device access
/// stays on the worker thread; the controller only holds the cancellation
/// token and the join handle.
pub struct CameraController {
    cancel: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl CameraController {
    /// Opens the capture device and arms the capture delay. Device failures
    /// are reported on `event_tx` rather than returned, so the UI stays
    /// responsive while the device negotiates.
    pub fn open(
        settings: &CameraSettings,
        preview_tx: mpsc::Sender<RgbImage>,
        event_tx: mpsc::Sender<CameraEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let settings = settings.clone();

        let worker = thread::spawn(move || {
            let delay = Duration::from_millis(settings.capture_delay_ms);
            let result = NokhwaSource::open(&settings)
                .and_then(|mut source| run_capture(&mut source, delay, &preview_tx, &event_tx, &token));
            if let Err(e) = result {
                warn!("Camera worker stopped: {}", e);
                let _ = event_tx.blocking_send(CameraEvent::Error(e));
            }
        });

        Self {
            cancel,
            worker: Some(worker),
        }
    }

    /// Cancels a pending capture window and waits for the device to be
    /// released. Idempotent; safe to call when the worker already finished.
    pub fn release(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        self.release();
    }
}

fn run_capture(
    source: &mut impl FrameSource,
    capture_delay: Duration,
    preview_tx: &mpsc::Sender<RgbImage>,
    event_tx: &mpsc::Sender<CameraEvent>,
    cancel: &CancellationToken,
) -> Result<(), AppError> {
    let deadline = Instant::now() + capture_delay;
    loop {
        if cancel.is_cancelled() {
            let _ = source.stop();
            debug!("Capture aborted before the delay elapsed");
            return Ok(());
        }

        let rgb = match source.frame() {
            Ok(rgb) => rgb,
            Err(e) => {
                let _ = source.stop();
                return Err(e);
            }
        };

        if Instant::now() >= deadline {
            // Release the device before reporting the capture; the stream is
            // never held past the delay window.
            if let Err(e) = source.stop() {
                warn!("Failed to stop camera stream cleanly: {}", e);
            }
            let still = StillImage::from_rgb(rgb)?;
            info!(id = %still.id, "Still frame captured, device released");
            let _ = event_tx.blocking_send(CameraEvent::Captured(still));
            return Ok(());
        }

        // Lossy preview; dropped frames are fine.
        let _ = preview_tx.try_send(rgb);
    }
}

use std::sync::Arc;

use image::RgbImage;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError as MpscTryRecvError;
use tracing::{error, info, warn};

use crate::app::state::{CaptureState, SessionState, UiUpdate};
use crate::app::views::View;
use crate::app::views::capture_view::CaptureView;
use crate::app::views::playlist_view::PlaylistView;
use crate::backend::client::{BackendClient, MusicBackend};
use crate::camera::controller::{CameraController, CameraEvent};
use crate::config::Settings;
use crate::error::AppError;
use crate::location::LocationProbe;
use crate::pipeline::context::SessionContext;
use crate::pipeline::step::RecommendationPipeline;

pub struct MoodTunesApp {
    settings: Settings,
    backend: Arc<dyn MusicBackend>,
    state: SessionState,
    camera: Option<CameraController>,
    preview_rx: Option<mpsc::Receiver<RgbImage>>,
    camera_event_rx: Option<mpsc::Receiver<CameraEvent>>,
    ui_update_rx: mpsc::Receiver<UiUpdate>,
    ui_update_tx: mpsc::Sender<UiUpdate>,
    preview_texture: Option<egui::TextureHandle>,
    still_texture: Option<egui::TextureHandle>,
    errors: Vec<AppError>,
}

impl MoodTunesApp {
    pub fn new(
        settings: Settings,
        backend: Arc<dyn MusicBackend>,
        ui_update_tx: mpsc::Sender<UiUpdate>,
        ui_update_rx: mpsc::Receiver<UiUpdate>,
    ) -> Self {
        Self {
            settings,
            backend,
            state: SessionState::new(),
            camera: None,
            preview_rx: None,
            camera_event_rx: None,
            ui_update_rx,
            ui_update_tx,
            preview_texture: None,
            still_texture: None,
            errors: Vec::new(),
        }
    }

    pub fn start_gui(settings: Settings) -> Result<(), AppError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(1024.0, 768.0))
                .with_title("MoodTunes"),
            ..Default::default()
        };

        let (ui_update_tx, ui_update_rx) = mpsc::channel::<UiUpdate>(64);
        let backend: Arc<dyn MusicBackend> = Arc::new(BackendClient::new(&settings.backend)?);

        // Best-effort, one-shot location probe; failure only logs.
        if settings.location.enabled {
            match LocationProbe::new(&settings.location) {
                Ok(probe) => {
                    let location_tx = ui_update_tx.clone();
                    tokio::spawn(async move {
                        if let Some(location) = probe.probe().await {
                            let _ = location_tx.send(UiUpdate::Location(location)).await;
                        }
                    });
                }
                Err(e) => warn!("Location probe not started: {}", e),
            }
        }

        let result = eframe::run_native(
            "MoodTunes",
            options,
            Box::new(move |cc| {
                egui_extras::install_image_loaders(&cc.egui_ctx);
                Ok(Box::new(MoodTunesApp::new(
                    settings,
                    backend,
                    ui_update_tx,
                    ui_update_rx,
                )))
            }),
        );
        result.map_err(|e| AppError::Ui(e.to_string()))
    }

    /// Aborts any pending capture window and releases the device.
    fn release_camera(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.release();
        }
        self.preview_rx = None;
        self.camera_event_rx = None;
        self.preview_texture = None;
    }

    fn open_camera(&mut self) {
        self.release_camera();

        let (preview_tx, preview_rx) =
            mpsc::channel(self.settings.camera.preview_buffer_size.max(1));
        let (event_tx, event_rx) = mpsc::channel(8);
        self.camera = Some(CameraController::open(
            &self.settings.camera,
            preview_tx,
            event_tx,
        ));
        self.preview_rx = Some(preview_rx);
        self.camera_event_rx = Some(event_rx);
        self.still_texture = None;
        self.state.capture = CaptureState::Streaming;
        info!(
            delay_ms = self.settings.camera.capture_delay_ms,
            "Camera opened, capture armed"
        );
    }

    fn trigger_detection(&mut self) {
        if self.state.loading {
            return;
        }
        let still = match self.state.capture.still() {
            Some(still) => still.clone(),
            None => return,
        };
        self.state.loading = true;

        let backend = self.backend.clone();
        let context = SessionContext::new(still);
        let ui_tx = self.ui_update_tx.clone();
        tokio::spawn(run_pipeline(backend, context, ui_tx));
    }

    fn drain_ui_updates(&mut self) {
        loop {
            match self.ui_update_rx.try_recv() {
                Ok(UiUpdate::Location(location)) => {
                    self.state.location = Some(location);
                }
                Ok(UiUpdate::Session(snapshot)) => {
                    self.state.apply_snapshot(snapshot);
                }
                Ok(UiUpdate::PipelineFinished { error }) => {
                    self.state.loading = false;
                    if let Some(e) = error {
                        self.errors.push(e);
                    }
                }
                Err(MpscTryRecvError::Empty) => break,
                Err(MpscTryRecvError::Disconnected) => {
                    error!("UI update receiver disconnected");
                    break;
                }
            }
        }
    }

    fn drain_camera_events(&mut self) {
        let mut events = Vec::new();
        if let Some(event_rx) = &mut self.camera_event_rx {
            while let Ok(event) = event_rx.try_recv() {
                events.push(event);
            }
        }
        for event in events {
            match event {
                CameraEvent::Captured(still) => {
                    info!(id = %still.id, "Still frame received");
                    self.state.capture = CaptureState::Captured(still);
                    // The worker already released the device; this joins it.
                    self.release_camera();
                }
                CameraEvent::Error(e) => {
                    error!("Camera flow halted: {}", e);
                    self.state.capture = CaptureState::Idle;
                    self.errors.push(e);
                    self.release_camera();
                }
            }
        }
    }

    fn refresh_textures(&mut self, ctx: &egui::Context) {
        // Keep only the newest preview frame.
        let mut latest = None;
        if let Some(preview_rx) = &mut self.preview_rx {
            while let Ok(frame) = preview_rx.try_recv() {
                latest = Some(frame);
            }
        }
        if let Some(frame) = latest {
            self.preview_texture = Some(load_rgb_texture(ctx, "camera_preview", &frame));
        }

        if let CaptureState::Captured(still) = &self.state.capture {
            if self.still_texture.is_none() {
                self.still_texture = Some(load_rgb_texture(ctx, "captured_still", &still.rgb));
            }
        }
    }
}

impl eframe::App for MoodTunesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_ui_updates();
        self.drain_camera_events();
        self.refresh_textures(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Emotion to Music");
            if let Some(location) = &self.state.location {
                ui.label(format!(
                    "Your Location: {:.4}, {:.4}",
                    location.latitude, location.longitude
                ));
            }
        });

        egui::TopBottomPanel::bottom("error_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Error Log");
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for error in self.errors.iter().rev() {
                        ui.label(format!("[ERROR] {}", error));
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                if ui.button("Open Camera").clicked() {
                    self.open_camera();
                }

                let mut capture_view = CaptureView::new(
                    self.preview_texture.clone(),
                    self.still_texture.clone(),
                    self.state.capture.is_streaming(),
                );
                capture_view.draw(ui);

                ui.separator();

                let can_detect = self.state.capture.still().is_some() && !self.state.loading;
                let label = if self.state.loading {
                    "Processing..."
                } else {
                    "Detect Emotion & Get Music"
                };
                ui.horizontal(|ui| {
                    if ui.add_enabled(can_detect, egui::Button::new(label)).clicked() {
                        self.trigger_detection();
                    }
                    if self.state.loading {
                        ui.spinner();
                    }
                });

                if let Some(emotion) = &self.state.emotion {
                    ui.separator();
                    ui.label(format!("Detected Emotion: {}", emotion));
                }

                ui.separator();
                let mut playlist_view = PlaylistView::new(&self.state.playlist);
                playlist_view.draw(ui);
            });
        });

        ctx.request_repaint();
    }
}

/// Runs one recommendation session and reports back on `ui_tx`. Stage
/// snapshots and the finishing message share the one channel, so the
/// finishing message always lands after the last snapshot.
async fn run_pipeline(
    backend: Arc<dyn MusicBackend>,
    context: SessionContext,
    ui_tx: mpsc::Sender<UiUpdate>,
) {
    let (progress_tx, mut progress_rx) = mpsc::channel(8);

    let run = async move {
        let mut pipeline = RecommendationPipeline::for_backend(backend).with_progress(progress_tx);
        pipeline.process(context).await
        // The pipeline drops here, closing the progress channel.
    };
    let forward = async {
        while let Some(snapshot) = progress_rx.recv().await {
            let _ = ui_tx.send(UiUpdate::Session(snapshot)).await;
        }
    };
    let (result, ()) = tokio::join!(run, forward);

    let error = match result {
        Ok(context) => {
            info!(
                total_us = context.metrics.total_duration_us,
                "Recommendation pipeline finished"
            );
            None
        }
        Err(e) => {
            error!("Recommendation pipeline failed: {}", e);
            Some(e)
        }
    };
    let _ = ui_tx.send(UiUpdate::PipelineFinished { error }).await;
}

fn load_rgb_texture(
    ctx: &egui::Context,
    name: &str,
    image: &RgbImage,
) -> egui::TextureHandle {
    let color_image = egui::ColorImage::from_rgb(
        [image.width() as usize, image.height() as usize],
        image.as_raw().as_slice(),
    );
    ctx.load_texture(name, color_image, egui::TextureOptions::default())
}

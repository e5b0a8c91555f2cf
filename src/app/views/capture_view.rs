use crate::app::views::View;

const FEED_HEIGHT: f32 = 320.0;

/// Renders the camera section: live preview while streaming, then the
/// captured still with its processed badge.
pub struct CaptureView {
    preview: Option<egui::TextureHandle>,
    still: Option<egui::TextureHandle>,
    streaming: bool,
}

impl CaptureView {
    pub fn new(
        preview: Option<egui::TextureHandle>,
        still: Option<egui::TextureHandle>,
        streaming: bool,
    ) -> Self {
        Self {
            preview,
            still,
            streaming,
        }
    }
}

impl View for CaptureView {
    fn draw(&mut self, ui: &mut egui::Ui) {
        if let Some(still) = &self.still {
            ui.add(egui::Image::new(still).max_height(FEED_HEIGHT));
            ui.colored_label(
                egui::Color32::LIGHT_GREEN,
                "✓ Image processed successfully!",
            );
        } else if let Some(preview) = &self.preview {
            ui.add(egui::Image::new(preview).max_height(FEED_HEIGHT));
        } else if self.streaming {
            ui.label("Opening camera...");
        }
    }
}

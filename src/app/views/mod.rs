pub mod capture_view;
pub mod playlist_view;

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}

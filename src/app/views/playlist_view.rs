use crate::app::views::View;
use crate::backend::types::EnrichedSong;

/// Shown when the enrichment service returns no cover for a song.
const PLACEHOLDER_COVER: &str =
    "https://images.unsplash.com/photo-1614149162883-504ce4d13909?w=400&h=300&fit=crop";

const CARD_WIDTH: f32 = 220.0;
const COVER_SIZE: egui::Vec2 = egui::Vec2::new(200.0, 150.0);

/// Grid of enriched playlist cards. A card is clickable only when its
/// Spotify link is present; clicking opens the link in a new browser tab.
pub struct PlaylistView<'a> {
    songs: &'a [EnrichedSong],
}

impl<'a> PlaylistView<'a> {
    pub fn new(songs: &'a [EnrichedSong]) -> Self {
        Self { songs }
    }

    fn draw_card(&self, ui: &mut egui::Ui, song: &EnrichedSong) {
        let cover = song
            .cover
            .as_deref()
            .filter(|cover| !cover.is_empty())
            .unwrap_or(PLACEHOLDER_COVER);

        let response = ui
            .group(|ui| {
                ui.set_width(CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.add(egui::Image::from_uri(cover).fit_to_exact_size(COVER_SIZE));
                    ui.label(egui::RichText::new(&song.name).strong());
                    ui.label(&song.artist);
                    if song.spotify_link.is_some() {
                        ui.weak("Open in Spotify");
                    }
                });
            })
            .response;

        if let Some(link) = &song.spotify_link {
            if response.interact(egui::Sense::click()).clicked() {
                ui.ctx().open_url(egui::OpenUrl::new_tab(link));
            }
        }
    }
}

impl View for PlaylistView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        if self.songs.is_empty() {
            return;
        }
        ui.heading("Your Personal Playlist");
        ui.horizontal_wrapped(|ui| {
            for song in self.songs {
                self.draw_card(ui, song);
            }
        });
    }
}

pub mod client;
pub mod types;

pub use client::{BackendClient, MusicBackend};
pub use types::{EnrichedSong, SongRequest};

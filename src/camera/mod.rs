pub mod controller;
pub mod still;

pub use controller::{CameraController, CameraEvent};
pub use still::StillImage;

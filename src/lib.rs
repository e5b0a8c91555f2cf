pub mod app;
pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod location;
pub mod pipeline;

pub use error::AppError;

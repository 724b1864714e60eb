pub mod cli;
pub mod config;
pub mod core;
pub mod demo;

pub use crate::config::DriverConfig;
pub use crate::core::{Event, PixelFormat, Renderer, VideoDevice, VideoError, VideoFlags};

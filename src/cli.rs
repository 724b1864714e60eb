// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::DriverConfig;
use crate::core::VideoFlags;

#[derive(Parser, Debug, Clone)]
#[command(name = "android-video")]
#[command(about = "Framebuffer video driver demo on a desktop window", long_about = None)]
pub struct Cli {
    /// JSON driver config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logical surface width
    #[arg(long, default_value = "320")]
    pub width: u32,

    /// Logical surface height
    #[arg(long, default_value = "240")]
    pub height: u32,

    /// Requested color depth
    #[arg(long, default_value = "16")]
    pub bpp: u8,

    /// Allocate a back buffer and alternate on each flip
    #[arg(long = "double-buffer", default_value = "false")]
    pub double_buffer: bool,

    /// Draw straight to the GPU; no framebuffer is allocated
    #[arg(long = "gpu-direct", default_value = "false")]
    pub gpu_direct: bool,

    /// Override the directional key release delay, in flips
    #[arg(long = "key-delay")]
    pub key_delay: Option<u32>,

    /// Override the sleep after each flip, in milliseconds
    #[arg(long = "frame-delay-ms")]
    pub frame_delay_ms: Option<u64>,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    pub fn driver_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::load(path)?,
            None => DriverConfig::default(),
        };
        if let Some(delay) = self.key_delay {
            config.key_repeat_delay = delay;
        }
        if let Some(delay) = self.frame_delay_ms {
            config.frame_delay_ms = delay;
        }
        Ok(config)
    }

    pub fn video_flags(&self) -> VideoFlags {
        let mut flags = VideoFlags::empty();
        flags.set(VideoFlags::DOUBLE_BUFFER, self.double_buffer);
        flags.set(VideoFlags::GPU_DIRECT, self.gpu_direct);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["android-video"]);
        assert_eq!((cli.width, cli.height, cli.bpp), (320, 240, 16));
        assert_eq!(cli.video_flags(), VideoFlags::empty());
        assert_eq!(cli.driver_config().unwrap(), DriverConfig::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "android-video",
            "--double-buffer",
            "--key-delay",
            "5",
            "--frame-delay-ms",
            "0",
        ]);
        assert!(cli.video_flags().contains(VideoFlags::DOUBLE_BUFFER));
        let config = cli.driver_config().unwrap();
        assert_eq!(config.key_repeat_delay, 5);
        assert_eq!(config.frame_delay_ms, 0);
    }
}

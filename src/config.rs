// config.rs - Driver configuration, loadable from JSON
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::ScreenGeometry;

/// Tunables for a video device instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Ticks a directional release is deferred by; 0 disables the emulation
    pub key_repeat_delay: u32,
    /// Sleep after every flip, in milliseconds
    pub frame_delay_ms: u64,
    /// Physical screen assumed until the host reports one
    pub screen_width: u32,
    pub screen_height: u32,
    /// Put the raw keycode into the key symbol's unicode field
    pub translate_unicode: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            key_repeat_delay: 0,
            frame_delay_ms: 10,
            screen_width: ScreenGeometry::DEFAULT.width,
            screen_height: ScreenGeometry::DEFAULT.height,
            translate_unicode: false,
        }
    }
}

impl DriverConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse driver config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            bail!(
                "screen dimensions must be positive, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        Ok(())
    }

    pub fn screen(&self) -> ScreenGeometry {
        ScreenGeometry::new(self.screen_width, self.screen_height).unwrap_or_default()
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

/// Failure reported by a `Renderer` implementation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("renderer: {0}")]
pub struct RendererError(pub String);

impl RendererError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors surfaced by the video device to the display abstraction
///
/// Every failure is single-shot: nothing is retried and a failed mode-set
/// leaves the device with no surface attached.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoError {
    #[error("couldn't allocate {bytes} bytes for requested mode")]
    OutOfMemory { bytes: usize },

    #[error("couldn't allocate pixel format for {bpp} bits per pixel")]
    UnsupportedDepth { bpp: u8 },

    #[error("invalid mode dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("mode {width}x{height} exceeds the 1024 texel texture limit")]
    ModeTooLarge { width: u32, height: u32 },

    #[error("hardware surfaces are not supported")]
    HardwareSurfaceUnsupported,

    #[error(transparent)]
    Renderer(#[from] RendererError),
}

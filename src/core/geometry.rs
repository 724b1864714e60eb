/// Physical screen dimensions reported by the host
///
/// Only used to pick the scale/crop policy on flip; the logical buffer is
/// never resized to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ScreenGeometry {
    /// Screen assumed until the host reports its real size
    pub const DEFAULT: Self = Self { width: 320, height: 480 };

    /// Create geometry, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Whether a logical surface of this size fits without scaling
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rectangle in pixels, used for mode lists and update requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

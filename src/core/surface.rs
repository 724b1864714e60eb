use bitflags::bitflags;

use super::error::VideoError;
use super::format::PixelFormat;

bitflags! {
    /// Mode-set request flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct VideoFlags: u32 {
        /// Application renders with the GPU itself; no logical buffer exists
        const GPU_DIRECT = 0x0000_0002;
        /// Keep two logical buffers and alternate them on every flip
        const DOUBLE_BUFFER = 0x4000_0000;
        /// Accepted for compatibility; the surface always fills the screen
        const FULLSCREEN = 0x8000_0000;
    }
}

/// Which owned buffer is current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSlot {
    Front,
    Back,
}

impl BufferSlot {
    pub fn other(self) -> Self {
        match self {
            BufferSlot::Front => BufferSlot::Back,
            BufferSlot::Back => BufferSlot::Front,
        }
    }
}

/// What the display abstraction sees after a successful mode-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
    pub format: PixelFormat,
    pub flags: VideoFlags,
    /// Buffer the application writes into; `None` in GPU-direct mode
    pub buffer: Option<BufferSlot>,
}

/// Zero-filled buffer, reporting exhaustion instead of aborting
fn zeroed(len: usize) -> Result<Vec<u8>, VideoError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| VideoError::OutOfMemory { bytes: len })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Application-writable framebuffer, optionally double-buffered
#[derive(Debug)]
pub struct LogicalSurface {
    width: u32,
    height: u32,
    pitch: usize,
    front: Vec<u8>,
    back: Option<Vec<u8>>,
    current: BufferSlot,
}

impl LogicalSurface {
    /// Allocate one zeroed buffer, or two when `double_buffer` is set
    pub fn allocate(
        width: u32,
        height: u32,
        format: PixelFormat,
        double_buffer: bool,
    ) -> Result<Self, VideoError> {
        let pitch = format.pitch(width);
        let len = pitch
            .checked_mul(height as usize)
            .ok_or(VideoError::OutOfMemory { bytes: usize::MAX })?;

        let front = zeroed(len)?;
        let back = if double_buffer { Some(zeroed(len)?) } else { None };

        Ok(Self {
            width,
            height,
            pitch,
            front,
            back,
            current: BufferSlot::Front,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn is_double_buffered(&self) -> bool {
        self.back.is_some()
    }

    /// Number of pixel buffers this surface owns
    pub fn buffer_count(&self) -> usize {
        1 + usize::from(self.back.is_some())
    }

    pub fn current(&self) -> BufferSlot {
        self.current
    }

    pub fn pixels(&self) -> &[u8] {
        match (self.current, &self.back) {
            (BufferSlot::Back, Some(back)) => back,
            _ => &self.front,
        }
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        match (self.current, &mut self.back) {
            (BufferSlot::Back, Some(back)) => back,
            _ => &mut self.front,
        }
    }

    /// Make the other buffer current; single-buffered surfaces stay put
    pub fn swap(&mut self) -> BufferSlot {
        if self.back.is_some() {
            self.current = self.current.other();
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_single() {
        let surface = LogicalSurface::allocate(320, 240, PixelFormat::RGB565, false).unwrap();
        assert_eq!(surface.pitch(), 640);
        assert_eq!(surface.pixels().len(), 640 * 240);
        assert_eq!(surface.buffer_count(), 1);
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_allocate_double() {
        let surface = LogicalSurface::allocate(64, 32, PixelFormat::RGB565, true).unwrap();
        assert!(surface.is_double_buffered());
        assert_eq!(surface.buffer_count(), 2);
        assert_eq!(surface.current(), BufferSlot::Front);
    }

    #[test]
    fn test_swap_alternates_and_separates_buffers() {
        let mut surface = LogicalSurface::allocate(4, 4, PixelFormat::RGB565, true).unwrap();
        surface.pixels_mut()[0] = 0xAA;

        assert_eq!(surface.swap(), BufferSlot::Back);
        assert_eq!(surface.pixels()[0], 0, "back buffer starts zeroed");

        assert_eq!(surface.swap(), BufferSlot::Front);
        assert_eq!(surface.pixels()[0], 0xAA);
    }

    #[test]
    fn test_swap_single_buffer_is_noop() {
        let mut surface = LogicalSurface::allocate(4, 4, PixelFormat::RGB565, false).unwrap();
        assert_eq!(surface.swap(), BufferSlot::Front);
        assert_eq!(surface.swap(), BufferSlot::Front);
    }

    #[test]
    fn test_allocate_huge_reports_out_of_memory() {
        let result = LogicalSurface::allocate(u32::MAX, u32::MAX, PixelFormat::for_depth(32).unwrap(), false);
        assert!(matches!(result, Err(VideoError::OutOfMemory { .. })));
    }

    #[test]
    fn test_flags_compose() {
        let flags = VideoFlags::DOUBLE_BUFFER | VideoFlags::FULLSCREEN;
        assert!(flags.contains(VideoFlags::DOUBLE_BUFFER));
        assert!(!flags.contains(VideoFlags::GPU_DIRECT));
    }
}

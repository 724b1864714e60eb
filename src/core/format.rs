use super::error::VideoError;

/// Pixel format descriptor negotiated on mode-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub bytes_per_pixel: u8,
    pub r_mask: u32,
    pub g_mask: u32,
    pub b_mask: u32,
}

impl PixelFormat {
    /// The format the GPU texture is uploaded as: RGB 5-6-5
    pub const RGB565: Self = Self {
        bits_per_pixel: 16,
        bytes_per_pixel: 2,
        r_mask: 0xF800,
        g_mask: 0x07E0,
        b_mask: 0x001F,
    };

    /// Default format for a pixel depth, with zero masks picked by depth
    pub fn for_depth(bpp: u8) -> Result<Self, VideoError> {
        match bpp {
            8 => Ok(Self {
                bits_per_pixel: 8,
                bytes_per_pixel: 1,
                r_mask: 0,
                g_mask: 0,
                b_mask: 0,
            }),
            16 => Ok(Self::RGB565),
            24 | 32 => Ok(Self {
                bits_per_pixel: bpp,
                bytes_per_pixel: bpp / 8,
                r_mask: 0x00FF_0000,
                g_mask: 0x0000_FF00,
                b_mask: 0x0000_00FF,
            }),
            _ => Err(VideoError::UnsupportedDepth { bpp }),
        }
    }

    /// Bytes per row for a surface of the given width
    pub fn pitch(&self, width: u32) -> usize {
        width as usize * self.bytes_per_pixel as usize
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::RGB565
    }
}

/// Pack 8-bit channels into a native-endian 5-6-5 texel
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3)
}

/// Expand one 5-6-5 texel to opaque RGBA8, replicating high bits into the gap
pub fn rgb565_to_rgba(texel: u16) -> [u8; 4] {
    let r = ((texel >> 11) & 0x1F) as u8;
    let g = ((texel >> 5) & 0x3F) as u8;
    let b = (texel & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), 255]
}

/// Expand tightly packed 5-6-5 rows into RGBA8
///
/// A trailing odd byte is ignored.
pub fn expand_rgb565(src: &[u8], dst: &mut Vec<u8>) {
    dst.clear();
    dst.reserve(src.len() * 2);
    for pair in src.chunks_exact(2) {
        let texel = u16::from_ne_bytes([pair[0], pair[1]]);
        dst.extend_from_slice(&rgb565_to_rgba(texel));
    }
}

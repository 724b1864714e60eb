/// Largest texture edge the presentation path allocates
pub const MAX_TEXTURE_EDGE: u32 = 1024;

/// Snap a logical edge to the smallest of 256, 512 or 1024 that holds it
///
/// Edges above 1024 are capped; mode-set refuses such modes before a
/// texture is ever created.
pub fn padded_edge(logical: u32) -> u32 {
    if logical <= 256 {
        256
    } else if logical <= 512 {
        512
    } else {
        MAX_TEXTURE_EDGE
    }
}

/// Texel storage format of the presentation texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelFormat {
    /// 16-bit RGB, 5-6-5 packing
    Rgb565,
}

impl TexelFormat {
    pub fn bytes_per_texel(&self) -> usize {
        match self {
            TexelFormat::Rgb565 => 2,
        }
    }
}

/// Sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
}

/// Everything a renderer needs to allocate the presentation texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: TexelFormat,
    pub filter: Filter,
}

impl TextureDescriptor {
    /// Padded, nearest-filtered 5-6-5 texture for a logical surface
    pub fn for_logical(width: u32, height: u32) -> Self {
        Self {
            width: padded_edge(width),
            height: padded_edge(height),
            format: TexelFormat::Rgb565,
            filter: Filter::Nearest,
        }
    }

    /// Byte size of a full-texture upload
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_texel()
    }
}

/// Sub-region of a padded texture to sample, in texels
///
/// A negative height samples rows bottom-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    /// Crop the logical region, flipped vertically
    ///
    /// Texture rows start at the bottom while the logical buffer is top-down.
    pub fn flipped(width: u32, height: u32) -> Self {
        let height = height as i32;
        Self {
            x: 0,
            y: height,
            width: width as i32,
            height: -height,
        }
    }
}

/// Opaque texture handle issued by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// The presentation texture bound to the current mode
///
/// Shared with the renderer, not owned by the logical surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuTexture {
    pub id: TextureId,
    pub descriptor: TextureDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_edge_snaps_to_power_of_two() {
        let cases = [
            (1, 256),
            (256, 256),
            (257, 512),
            (512, 512),
            (1000, 1024),
            (1024, 1024),
        ];

        for (logical, expected) in cases {
            let padded = padded_edge(logical);
            assert_eq!(padded, expected, "logical edge {}", logical);
            assert!(padded >= logical, "padded {} below logical {}", padded, logical);
        }
    }

    #[test]
    fn test_padded_edge_caps() {
        assert_eq!(padded_edge(2048), MAX_TEXTURE_EDGE);
    }

    #[test]
    fn test_descriptor_axes_independent() {
        let desc = TextureDescriptor::for_logical(320, 200);
        assert_eq!((desc.width, desc.height), (512, 256));
        assert_eq!(desc.filter, Filter::Nearest);
        assert_eq!(desc.byte_len(), 512 * 256 * 2);
    }

    #[test]
    fn test_crop_is_flipped() {
        let crop = CropRect::flipped(320, 240);
        assert_eq!(crop, CropRect { x: 0, y: 240, width: 320, height: -240 });
    }
}

use super::error::RendererError;
use super::geometry::ScreenGeometry;
use super::texture::{CropRect, TextureDescriptor, TextureId};

/// Destination rectangle in window coordinates, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// How the logical surface is mapped onto the physical screen
///
/// Never scale up; always scale down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Larger than the screen on either axis: stretch to exactly the screen
    ShrinkToFit,
    /// Fits on both axes: drawn 1:1 at `y = screen height - logical height`
    Unscaled,
}

impl Placement {
    pub fn choose(screen: ScreenGeometry, width: u32, height: u32) -> Self {
        if screen.fits(width, height) {
            Placement::Unscaled
        } else {
            Placement::ShrinkToFit
        }
    }

    pub fn rect(self, screen: ScreenGeometry, width: u32, height: u32) -> DrawRect {
        match self {
            Placement::ShrinkToFit => DrawRect {
                x: 0,
                y: 0,
                width: screen.width,
                height: screen.height,
            },
            Placement::Unscaled => DrawRect {
                x: 0,
                y: screen.height as i32 - height as i32,
                width,
                height,
            },
        }
    }
}

/// GPU capability the presentation pipeline draws through
///
/// Calls arrive in this order per mode: `configure_viewport`,
/// `create_texture`, one full `upload_texture` of zeros, `set_crop_rect`,
/// `finish`. Every flip then does a sub-region `upload_texture` followed by
/// `draw_texture`. `delete_texture` runs on teardown.
pub trait Renderer {
    /// Viewport, orthographic unit projection, and depth/cull/dither/multisample disabled
    fn configure_viewport(&mut self, width: u32, height: u32);

    /// Allocate a texture with the given storage and sampling
    fn create_texture(&mut self, desc: &TextureDescriptor) -> Result<TextureId, RendererError>;

    /// Replace the `width` x `height` texels at the texture origin with tightly packed `pixels`
    fn upload_texture(
        &mut self,
        texture: TextureId,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), RendererError>;

    /// Whether the renderer can restrict sampling to a crop rectangle
    fn supports_crop_rect(&self) -> bool {
        true
    }

    /// Sample only `crop` of the texture from now on
    fn set_crop_rect(&mut self, texture: TextureId, crop: CropRect);

    /// Draw the cropped texture as a quad covering `dest`
    fn draw_texture(&mut self, texture: TextureId, dest: DrawRect) -> Result<(), RendererError>;

    /// Block until queued GPU work completes
    fn finish(&mut self) {}

    fn delete_texture(&mut self, texture: TextureId);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenGeometry {
        ScreenGeometry::new(320, 480).unwrap()
    }

    #[test]
    fn test_large_surface_shrinks() {
        assert_eq!(Placement::choose(screen(), 800, 600), Placement::ShrinkToFit);
    }

    #[test]
    fn test_small_surface_unscaled() {
        assert_eq!(Placement::choose(screen(), 200, 150), Placement::Unscaled);
    }

    #[test]
    fn test_exceeding_one_axis_shrinks() {
        assert_eq!(Placement::choose(screen(), 320, 481), Placement::ShrinkToFit);
        assert_eq!(Placement::choose(screen(), 321, 100), Placement::ShrinkToFit);
    }

    #[test]
    fn test_exact_fit_unscaled() {
        assert_eq!(Placement::choose(screen(), 320, 480), Placement::Unscaled);
    }

    #[test]
    fn test_shrink_rect_fills_screen() {
        let rect = Placement::ShrinkToFit.rect(screen(), 800, 600);
        assert_eq!(rect, DrawRect { x: 0, y: 0, width: 320, height: 480 });
    }

    #[test]
    fn test_unscaled_rect_offset() {
        let rect = Placement::Unscaled.rect(screen(), 200, 150);
        assert_eq!(rect, DrawRect { x: 0, y: 330, width: 200, height: 150 });
    }
}

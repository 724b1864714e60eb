use log::{debug, info, warn};

use super::error::VideoError;
use super::format::PixelFormat;
use super::geometry::ScreenGeometry;
use super::present::PresentCallback;
use super::renderer::{Placement, Renderer};
use super::surface::{BufferSlot, LogicalSurface, SurfaceDescriptor, VideoFlags};
use super::texture::{CropRect, GpuTexture, TextureDescriptor, MAX_TEXTURE_EDGE};

/// State that exists only between a successful mode-set and teardown
#[derive(Debug)]
struct ActiveMode {
    descriptor: SurfaceDescriptor,
    surface: Option<LogicalSurface>,
    texture: Option<GpuTexture>,
}

/// Owns the logical framebuffer(s) and blits them to the GPU on flip
///
/// Exactly one mode is live at a time. Setting a mode always tears the
/// previous one down first, even if the new one then fails.
pub struct PresentationPipeline<R: Renderer> {
    renderer: R,
    present: Option<Box<dyn PresentCallback>>,
    screen: ScreenGeometry,
    mode: Option<ActiveMode>,
}

impl<R: Renderer> PresentationPipeline<R> {
    pub fn new(renderer: R, screen: ScreenGeometry) -> Self {
        Self {
            renderer,
            present: None,
            screen,
            mode: None,
        }
    }

    /// Bind the host swap routine invoked at the end of every flip
    pub fn set_present_callback(&mut self, callback: Box<dyn PresentCallback>) {
        self.present = Some(callback);
    }

    pub fn screen(&self) -> ScreenGeometry {
        self.screen
    }

    /// Physical screen changed; the logical surface keeps its size
    pub fn set_screen(&mut self, screen: ScreenGeometry) {
        self.screen = screen;
    }

    /// Tear down the current mode and build a new one
    pub fn set_mode(
        &mut self,
        width: u32,
        height: u32,
        bpp: u8,
        flags: VideoFlags,
    ) -> Result<SurfaceDescriptor, VideoError> {
        info!("application requested mode {}x{} at {} bpp", width, height, bpp);
        self.teardown();

        if width == 0 || height == 0 {
            return Err(VideoError::InvalidDimensions { width, height });
        }

        let format = PixelFormat::for_depth(bpp).inspect_err(|e| warn!("{}", e))?;
        let gpu_direct = flags.contains(VideoFlags::GPU_DIRECT);

        let (surface, texture) = if gpu_direct {
            (None, None)
        } else {
            // the texture is RGB565, so only 16 bpp buffers can be uploaded
            if format != PixelFormat::RGB565 {
                warn!("{} bpp needs GPU-direct mode", bpp);
                return Err(VideoError::UnsupportedDepth { bpp });
            }
            if width > MAX_TEXTURE_EDGE || height > MAX_TEXTURE_EDGE {
                return Err(VideoError::ModeTooLarge { width, height });
            }
            let surface = LogicalSurface::allocate(
                width,
                height,
                format,
                flags.contains(VideoFlags::DOUBLE_BUFFER),
            )
            .inspect_err(|e| warn!("{}", e))?;
            let texture = self.init_texture(width, height)?;
            (Some(surface), Some(texture))
        };

        let descriptor = SurfaceDescriptor {
            width,
            height,
            pitch: format.pitch(width),
            format,
            flags: flags
                & (VideoFlags::FULLSCREEN | VideoFlags::DOUBLE_BUFFER | VideoFlags::GPU_DIRECT),
            buffer: surface.as_ref().map(LogicalSurface::current),
        };

        self.mode = Some(ActiveMode {
            descriptor,
            surface,
            texture,
        });
        Ok(descriptor)
    }

    /// Allocate the padded texture and prime it with zeros
    fn init_texture(&mut self, width: u32, height: u32) -> Result<GpuTexture, VideoError> {
        let descriptor = TextureDescriptor::for_logical(width, height);
        debug!(
            "texture {}x{} for logical {}x{}",
            descriptor.width, descriptor.height, width, height
        );

        self.renderer
            .configure_viewport(descriptor.width, descriptor.height);
        let id = self.renderer.create_texture(&descriptor)?;

        let staging = vec![0u8; descriptor.byte_len()];
        if let Err(e) = self
            .renderer
            .upload_texture(id, descriptor.width, descriptor.height, &staging)
        {
            self.renderer.delete_texture(id);
            return Err(e.into());
        }

        if self.renderer.supports_crop_rect() {
            self.renderer
                .set_crop_rect(id, CropRect::flipped(width, height));
        }
        self.renderer.finish();

        Ok(GpuTexture { id, descriptor })
    }

    /// Upload, draw, alternate buffers, then hand the frame to the host
    ///
    /// A no-op once torn down. A renderer failure loses only this frame:
    /// buffers still alternate and the host callback still runs before the
    /// error is returned.
    pub fn present(&mut self) -> Result<(), VideoError> {
        let Some(mode) = self.mode.as_mut() else {
            debug!("present without an active mode ignored");
            return Ok(());
        };

        let mut rendered = Ok(());
        if let (Some(surface), Some(texture)) = (mode.surface.as_mut(), mode.texture) {
            let (width, height) = (surface.width(), surface.height());
            let dest =
                Placement::choose(self.screen, width, height).rect(self.screen, width, height);
            rendered = self
                .renderer
                .upload_texture(texture.id, width, height, surface.pixels())
                .and_then(|()| self.renderer.draw_texture(texture.id, dest))
                .map_err(VideoError::from)
                .inspect_err(|e| warn!("frame dropped: {}", e));

            if mode.descriptor.flags.contains(VideoFlags::DOUBLE_BUFFER) {
                mode.descriptor.buffer = Some(surface.swap());
            }
        }

        match self.present.as_mut() {
            Some(callback) => {
                if !callback.swap_buffers() {
                    debug!("host reported frame not presented");
                }
            }
            None => debug!("no present callback registered"),
        }
        rendered
    }

    /// Release the texture and both buffers
    pub fn teardown(&mut self) {
        if let Some(mode) = self.mode.take() {
            if let Some(texture) = mode.texture {
                self.renderer.delete_texture(texture.id);
            }
            debug!(
                "released mode {}x{}",
                mode.descriptor.width, mode.descriptor.height
            );
        }
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn surface(&self) -> Option<&SurfaceDescriptor> {
        self.mode.as_ref().map(|mode| &mode.descriptor)
    }

    pub fn current_buffer(&self) -> Option<BufferSlot> {
        self.mode.as_ref().and_then(|mode| mode.descriptor.buffer)
    }

    /// Pixels of the buffer the application should write next
    pub fn pixels(&self) -> Option<&[u8]> {
        self.mode
            .as_ref()
            .and_then(|mode| mode.surface.as_ref())
            .map(LogicalSurface::pixels)
    }

    pub fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        self.mode
            .as_mut()
            .and_then(|mode| mode.surface.as_mut())
            .map(LogicalSurface::pixels_mut)
    }

    /// Logical pixel buffers currently held
    pub fn allocated_buffers(&self) -> usize {
        self.mode
            .as_ref()
            .and_then(|mode| mode.surface.as_ref())
            .map_or(0, LogicalSurface::buffer_count)
    }

    pub fn texture(&self) -> Option<GpuTexture> {
        self.mode.as_ref().and_then(|mode| mode.texture)
    }

    /// Policy the next flip will draw with
    pub fn placement(&self) -> Option<Placement> {
        self.surface()
            .map(|desc| Placement::choose(self.screen, desc.width, desc.height))
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

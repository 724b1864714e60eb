#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use android_video::core::{
    CropRect, DrawRect, PresentCallback, Renderer, RendererError, TextureDescriptor, TextureId,
};
use android_video::DriverConfig;

/// Everything the renderer was asked to do
#[derive(Debug, Default)]
pub struct RenderLog {
    pub viewports: Vec<(u32, u32)>,
    pub created: Vec<TextureDescriptor>,
    pub live: Vec<TextureId>,
    pub uploads: Vec<(TextureId, u32, u32, usize)>,
    pub crops: Vec<CropRect>,
    pub draws: Vec<DrawRect>,
    pub finishes: usize,
}

/// Renderer that records calls into a shared log
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub log: Rc<RefCell<RenderLog>>,
    pub crop_supported: bool,
    /// Every draw fails after being logged
    pub fail_draw: bool,
    next: u32,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            crop_supported: true,
            ..Self::default()
        }
    }
}

impl Renderer for RecordingRenderer {
    fn configure_viewport(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().viewports.push((width, height));
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> Result<TextureId, RendererError> {
        self.next += 1;
        let id = TextureId(self.next);
        let mut log = self.log.borrow_mut();
        log.created.push(*desc);
        log.live.push(id);
        Ok(id)
    }

    fn upload_texture(
        &mut self,
        texture: TextureId,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), RendererError> {
        self.log
            .borrow_mut()
            .uploads
            .push((texture, width, height, pixels.len()));
        Ok(())
    }

    fn supports_crop_rect(&self) -> bool {
        self.crop_supported
    }

    fn set_crop_rect(&mut self, _texture: TextureId, crop: CropRect) {
        self.log.borrow_mut().crops.push(crop);
    }

    fn draw_texture(&mut self, _texture: TextureId, dest: DrawRect) -> Result<(), RendererError> {
        self.log.borrow_mut().draws.push(dest);
        if self.fail_draw {
            return Err(RendererError::new("surface lost"));
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.log.borrow_mut().finishes += 1;
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.log.borrow_mut().live.retain(|&id| id != texture);
    }
}

/// Present callback counting how often the host was asked to swap
#[derive(Clone, Default)]
pub struct CountingPresenter {
    pub count: Rc<RefCell<usize>>,
}

impl CountingPresenter {
    pub fn calls(&self) -> usize {
        *self.count.borrow()
    }
}

impl PresentCallback for CountingPresenter {
    fn swap_buffers(&mut self) -> bool {
        *self.count.borrow_mut() += 1;
        true
    }
}

pub fn config(key_repeat_delay: u32) -> DriverConfig {
    DriverConfig {
        key_repeat_delay,
        frame_delay_ms: 0,
        ..DriverConfig::default()
    }
}

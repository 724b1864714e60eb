use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration, SurfaceTexture, Texture};
use winit::window::Window;

use super::error::RendererError;
use super::format::expand_rgb565;
use super::gpu_context::GpuContext;
use super::present::PresentCallback;
use super::renderer::{DrawRect, Renderer};
use super::texture::{CropRect, Filter, TexelFormat, TextureDescriptor, TextureId};

/// Crop uniform shared with `blit.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct CropUniform {
    rect: [f32; 4],
    texture_size: [f32; 2],
    _pad: [f32; 2],
}

impl CropUniform {
    fn new(crop: CropRect, width: u32, height: u32) -> Self {
        Self {
            rect: [crop.x as f32, crop.y as f32, crop.width as f32, crop.height as f32],
            texture_size: [width as f32, height as f32],
            _pad: [0.0; 2],
        }
    }
}

struct TextureSlot {
    texture: Texture,
    uniforms: Buffer,
    bind_group: BindGroup,
    width: u32,
    height: u32,
}

/// Frame drawn but not yet shown, handed from renderer to presenter
type PendingFrame = Rc<RefCell<Option<SurfaceTexture>>>;

/// Renders the presentation texture onto a window surface through wgpu
///
/// 5-6-5 texels are expanded to RGBA8 on upload, the crop rectangle is
/// applied in the fragment shader, and the destination rectangle becomes
/// the viewport. The drawn frame waits for [`SurfacePresenter`].
pub struct WgpuRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    textures: HashMap<TextureId, TextureSlot>,
    next_id: u32,
    staging: Vec<u8>,
    frame: PendingFrame,
}

impl WgpuRenderer {
    /// Create a renderer for a window
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create window surface")?;

        let (gpu, adapter) = pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?;

        // texels are uploaded as linear values; avoid an sRGB re-encode
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let bind_group_layout = Self::create_bind_group_layout(gpu.device());
        let render_pipeline =
            Self::create_render_pipeline(gpu.device(), &bind_group_layout, surface_format);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            render_pipeline,
            bind_group_layout,
            textures: HashMap::new(),
            next_id: 0,
            staging: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
        })
    }

    /// Present callback that shows frames drawn by this renderer
    pub fn presenter(&self) -> SurfacePresenter {
        SurfacePresenter {
            frame: self.frame.clone(),
        }
    }

    /// Resize the surface
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.frame.borrow_mut().take();
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface
            .configure(self.gpu.device(), &self.surface_config);
    }

    fn slot(&self, texture: TextureId) -> Result<&TextureSlot, RendererError> {
        self.textures
            .get(&texture)
            .ok_or_else(|| RendererError::new(format!("unknown texture {:?}", texture)))
    }

    fn acquire_frame(&self) -> Result<SurfaceTexture, RendererError> {
        if let Some(frame) = self.frame.borrow_mut().take() {
            return Ok(frame);
        }
        self.surface
            .get_current_texture()
            .map_err(|e| RendererError::new(format!("failed to acquire frame: {}", e)))
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        })
    }

    /// Unit-quad strip pipeline; no depth, no culling, single sample
    fn create_render_pipeline(
        device: &Device,
        bind_group_layout: &BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// Convert a lower-left destination rect into a viewport clipped to the target
fn viewport(dest: DrawRect, target_width: u32, target_height: u32) -> Option<[f32; 4]> {
    let left = dest.x.max(0) as f32;
    let right = (dest.x + dest.width as i32).min(target_width as i32) as f32;
    // flip to the top-left origin wgpu uses
    let top = (target_height as i32 - (dest.y + dest.height as i32)).max(0) as f32;
    let bottom = (target_height as i32 - dest.y).min(target_height as i32) as f32;

    (right > left && bottom > top).then_some([left, top, right - left, bottom - top])
}

impl Renderer for WgpuRenderer {
    fn configure_viewport(&mut self, width: u32, height: u32) {
        // projection and fixed state live in the blit pipeline
        debug!("configure viewport {}x{}", width, height);
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> Result<TextureId, RendererError> {
        let TexelFormat::Rgb565 = desc.format;
        let device = self.gpu.device();

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Screen Texture"),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let filter = match desc.filter {
            Filter::Nearest => wgpu::FilterMode::Nearest,
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Screen Texture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let full = CropRect {
            x: 0,
            y: 0,
            width: desc.width as i32,
            height: desc.height as i32,
        };
        let uniforms = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Crop Uniform Buffer"),
            contents: bytemuck::bytes_of(&CropUniform::new(full, desc.width, desc.height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Texture Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniforms.as_entire_binding(),
                },
            ],
        });

        self.next_id += 1;
        let id = TextureId(self.next_id);
        self.textures.insert(
            id,
            TextureSlot {
                texture,
                uniforms,
                bind_group,
                width: desc.width,
                height: desc.height,
            },
        );
        Ok(id)
    }

    fn upload_texture(
        &mut self,
        texture: TextureId,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), RendererError> {
        let expected = width as usize * height as usize * TexelFormat::Rgb565.bytes_per_texel();
        if pixels.len() < expected {
            return Err(RendererError::new(format!(
                "Invalid pixel buffer size: expected {} bytes, got {}",
                expected,
                pixels.len()
            )));
        }

        let slot = self
            .textures
            .get(&texture)
            .ok_or_else(|| RendererError::new(format!("unknown texture {:?}", texture)))?;
        if width > slot.width || height > slot.height {
            return Err(RendererError::new(format!(
                "Upload {}x{} exceeds texture {}x{}",
                width, height, slot.width, slot.height
            )));
        }

        expand_rgb565(&pixels[..expected], &mut self.staging);

        self.gpu.queue().write_texture(
            slot.texture.as_image_copy(),
            &self.staging,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn set_crop_rect(&mut self, texture: TextureId, crop: CropRect) {
        if let Some(slot) = self.textures.get(&texture) {
            let uniform = CropUniform::new(crop, slot.width, slot.height);
            self.gpu
                .queue()
                .write_buffer(&slot.uniforms, 0, bytemuck::bytes_of(&uniform));
        }
    }

    fn draw_texture(&mut self, texture: TextureId, dest: DrawRect) -> Result<(), RendererError> {
        let slot = self.slot(texture)?;
        let frame = self.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blit Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some([x, y, w, h]) =
                viewport(dest, self.surface_config.width, self.surface_config.height)
            {
                render_pass.set_viewport(x, y, w, h, 0.0, 1.0);
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &slot.bind_group, &[]);
                render_pass.draw(0..4, 0..1);
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        *self.frame.borrow_mut() = Some(frame);
        Ok(())
    }

    fn finish(&mut self) {
        self.gpu.wait_idle();
    }

    fn delete_texture(&mut self, texture: TextureId) {
        // wgpu frees the texture once nothing in flight references it
        self.textures.remove(&texture);
    }
}

/// Host swap routine for [`WgpuRenderer`]: presents the pending frame
pub struct SurfacePresenter {
    frame: PendingFrame,
}

impl PresentCallback for SurfacePresenter {
    fn swap_buffers(&mut self) -> bool {
        match self.frame.borrow_mut().take() {
            Some(frame) => {
                frame.present();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Can't build a WgpuRenderer without a window; test the pure helpers

    #[test]
    fn test_viewport_unscaled_sits_at_top() {
        // 200x150 at y = 480 - 150 on a 320x480 target
        let dest = DrawRect { x: 0, y: 330, width: 200, height: 150 };
        assert_eq!(viewport(dest, 320, 480), Some([0.0, 0.0, 200.0, 150.0]));
    }

    #[test]
    fn test_viewport_full_screen() {
        let dest = DrawRect { x: 0, y: 0, width: 320, height: 480 };
        assert_eq!(viewport(dest, 320, 480), Some([0.0, 0.0, 320.0, 480.0]));
    }

    #[test]
    fn test_viewport_clipped_to_target() {
        let dest = DrawRect { x: 0, y: 0, width: 640, height: 480 };
        assert_eq!(viewport(dest, 320, 240), Some([0.0, 0.0, 320.0, 240.0]));
    }

    #[test]
    fn test_viewport_offscreen_is_none() {
        let dest = DrawRect { x: 0, y: -200, width: 100, height: 100 };
        assert_eq!(viewport(dest, 320, 480), None);
    }

    #[test]
    fn test_crop_uniform_layout() {
        assert_eq!(std::mem::size_of::<CropUniform>(), 32);
        let uniform = CropUniform::new(CropRect::flipped(200, 150), 256, 256);
        assert_eq!(uniform.rect, [0.0, 150.0, 200.0, -150.0]);
        assert_eq!(uniform.texture_size, [256.0, 256.0]);
    }
}

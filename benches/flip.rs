use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use android_video::core::format::expand_rgb565;
use android_video::core::{
    CropRect, DrawRect, Renderer, RendererError, TextureDescriptor, TextureId, VideoDevice,
    VideoFlags,
};
use android_video::demo::Pattern;
use android_video::DriverConfig;

/// Renderer that only touches the upload bytes, so the bench measures the CPU side
struct NullRenderer {
    staging: Vec<u8>,
}

impl Renderer for NullRenderer {
    fn configure_viewport(&mut self, _width: u32, _height: u32) {}

    fn create_texture(&mut self, _desc: &TextureDescriptor) -> Result<TextureId, RendererError> {
        Ok(TextureId(1))
    }

    fn upload_texture(
        &mut self,
        _texture: TextureId,
        _width: u32,
        _height: u32,
        pixels: &[u8],
    ) -> Result<(), RendererError> {
        expand_rgb565(pixels, &mut self.staging);
        Ok(())
    }

    fn set_crop_rect(&mut self, _texture: TextureId, _crop: CropRect) {}

    fn draw_texture(&mut self, _texture: TextureId, _dest: DrawRect) -> Result<(), RendererError> {
        Ok(())
    }

    fn delete_texture(&mut self, _texture: TextureId) {}
}

fn device() -> VideoDevice<NullRenderer> {
    let config = DriverConfig {
        frame_delay_ms: 0,
        key_repeat_delay: 5,
        ..DriverConfig::default()
    };
    VideoDevice::new(NullRenderer { staging: Vec::new() }, &config)
}

fn bench_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("flip");

    for &(width, height) in &[(320u32, 240u32), (640, 480), (1024, 768)] {
        let mut device = device();
        if device
            .set_mode(width, height, 16, VideoFlags::DOUBLE_BUFFER)
            .is_err()
        {
            continue;
        }

        let label = format!("{}x{}", width, height);
        group.bench_with_input(BenchmarkId::new("double_buffer", &label), &label, |b, _| {
            b.iter(|| {
                device.flip().ok();
                black_box(device.current_buffer())
            })
        });
    }

    group.finish();
}

fn bench_draw_and_flip(c: &mut Criterion) {
    let mut device = device();
    if device.set_mode(320, 240, 16, VideoFlags::empty()).is_err() {
        return;
    }
    let pattern = Pattern::new(320, 240);
    let mut frame = 0u32;

    c.bench_function("pattern_draw_and_flip_320x240", |b| {
        b.iter(|| {
            if let Some(pixels) = device.pixels_mut() {
                pattern.draw(pixels, 320 * 2, frame);
            }
            frame = frame.wrapping_add(1);
            device.flip().ok();
        })
    });
}

fn bench_key_traffic(c: &mut Criterion) {
    let mut device = device();
    if device.set_mode(320, 240, 16, VideoFlags::empty()).is_err() {
        return;
    }

    c.bench_function("trackball_pulse_and_flip", |b| {
        b.iter(|| {
            device.notify_key(21, 1);
            device.notify_key(21, 0);
            device.notify_key(22, 1);
            device.flip().ok();
            while let Some(event) = device.poll_event() {
                black_box(event);
            }
        })
    });
}

criterion_group!(benches, bench_flip, bench_draw_and_flip, bench_key_traffic);
criterion_main!(benches);

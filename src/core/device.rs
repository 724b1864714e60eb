use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use super::error::VideoError;
use super::events::{Event, EventQueue, KeyState, PointerAction};
use super::format::PixelFormat;
use super::geometry::{Rect, ScreenGeometry};
use super::host::{self, HostHandle, HostInbox, HostMessage};
use super::key_repeat::{KeyFilter, Transition};
use super::keymap::{self, Keycode};
use super::pipeline::PresentationPipeline;
use super::present::PresentCallback;
use super::renderer::Renderer;
use super::surface::{BufferSlot, SurfaceDescriptor, VideoFlags};
use super::texture::MAX_TEXTURE_EDGE;
use crate::config::DriverConfig;

/// Placeholder cursor; the platform has none to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    _private: (),
}

/// Palette entry, accepted and ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const FALLBACK_MODES: [(u32, u32); 3] = [(640, 480), (320, 240), (320, 200)];

/// One video device instance: screen, framebuffers, input translation
///
/// Everything runs on the thread owning the GPU context. Hosts that
/// deliver input elsewhere go through [`VideoDevice::host_handle`].
/// `video_quit` must not race an in-flight `flip`; `&mut self` on both
/// makes that a borrow error here, and a flip after quit does nothing.
pub struct VideoDevice<R: Renderer> {
    pipeline: PresentationPipeline<R>,
    keys: KeyFilter,
    key_repeat_delay: u32,
    translate_unicode: bool,
    frame_delay: Duration,
    modes: Vec<Rect>,
    events: EventQueue,
    inbox: Option<HostInbox>,
}

impl<R: Renderer> VideoDevice<R> {
    pub fn new(renderer: R, config: &DriverConfig) -> Self {
        let keys = KeyFilter::from_delay(config.key_repeat_delay);
        if keys.is_emulating() {
            debug!("trackball release delay {} ticks", config.key_repeat_delay);
        }
        Self {
            pipeline: PresentationPipeline::new(renderer, config.screen()),
            keys,
            key_repeat_delay: config.key_repeat_delay,
            translate_unicode: config.translate_unicode,
            frame_delay: config.frame_delay(),
            modes: Vec::new(),
            events: EventQueue::new(),
            inbox: None,
        }
    }

    /// Report the default format and seed the mode list from the current screen
    ///
    /// A screen larger than the texture limit is left out, so every listed
    /// mode can be set.
    pub fn video_init(&mut self) -> PixelFormat {
        let screen = self.pipeline.screen();
        self.modes = std::iter::once((screen.width, screen.height))
            .filter(|&(w, h)| w <= MAX_TEXTURE_EDGE && h <= MAX_TEXTURE_EDGE)
            .chain(FALLBACK_MODES)
            .map(|(w, h)| Rect::sized(w, h))
            .collect();
        PixelFormat::RGB565
    }

    /// Available modes, largest first; empty for anything but 16 bpp
    pub fn list_modes(&self, format: &PixelFormat, _flags: VideoFlags) -> &[Rect] {
        if format.bits_per_pixel != 16 {
            return &[];
        }
        &self.modes
    }

    pub fn set_mode(
        &mut self,
        width: u32,
        height: u32,
        bpp: u8,
        flags: VideoFlags,
    ) -> Result<SurfaceDescriptor, VideoError> {
        self.pipeline.set_mode(width, height, bpp, flags)
    }

    pub fn surface(&self) -> Option<&SurfaceDescriptor> {
        self.pipeline.surface()
    }

    pub fn current_buffer(&self) -> Option<BufferSlot> {
        self.pipeline.current_buffer()
    }

    /// The buffer to draw the next frame into
    pub fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        self.pipeline.pixels_mut()
    }

    /// Present the current buffer, tick key timers, then pace
    ///
    /// A renderer failure is returned only after the tick and the sleep,
    /// so deferred key releases keep firing while frames are lost.
    pub fn flip(&mut self) -> Result<(), VideoError> {
        self.drain_host();
        if !self.pipeline.is_active() {
            debug!("flip without a video mode ignored");
            return Ok(());
        }

        let presented = self.pipeline.present();

        let unicode = self.translate_unicode;
        let events = &mut self.events;
        self.keys.tick(|transition| {
            events.push(key_event(transition, unicode));
        });

        if !self.frame_delay.is_zero() {
            thread::sleep(self.frame_delay);
        }
        presented
    }

    /// Partial updates are not tracked; always a full flip
    pub fn update_rects(&mut self, _rects: &[Rect]) -> Result<(), VideoError> {
        self.flip()
    }

    pub fn gl_swap_buffers(&mut self) -> Result<(), VideoError> {
        self.flip()
    }

    /// Release the mode and reset all tracked state
    ///
    /// Pending key releases and queued events are discarded; the screen
    /// geometry and the present callback stay.
    pub fn video_quit(&mut self) {
        self.pipeline.teardown();
        self.modes.clear();
        self.keys = KeyFilter::from_delay(self.key_repeat_delay);
        self.events.clear();
        info!("video device shut down");
    }

    pub fn set_colors(&mut self, _first: usize, _colors: &[Color]) -> bool {
        true
    }

    pub fn create_cursor(
        &mut self,
        _data: &[u8],
        _mask: &[u8],
        _width: u32,
        _height: u32,
        _hot_x: i32,
        _hot_y: i32,
    ) -> Cursor {
        Cursor { _private: () }
    }

    pub fn free_cursor(&mut self, _cursor: Cursor) {}

    pub fn show_cursor(&mut self, _cursor: Option<&Cursor>) -> bool {
        true
    }

    pub fn warp_cursor(&mut self, _x: u16, _y: u16) {}

    pub fn move_cursor(&mut self, _x: i32, _y: i32) {}

    /// Only the single screen surface exists
    pub fn alloc_hw_surface(&mut self, _width: u32, _height: u32) -> Result<(), VideoError> {
        Err(VideoError::HardwareSurfaceUnsupported)
    }

    pub fn lock_hw_surface(&mut self) -> Result<(), VideoError> {
        Ok(())
    }

    pub fn unlock_hw_surface(&mut self) {}

    pub fn free_hw_surface(&mut self) {}

    /// Events arrive through the host entry points; this only drains the hand-off queue
    pub fn pump_events(&mut self) {
        self.drain_host();
    }

    pub fn poll_event(&mut self) -> Option<Event> {
        self.events.poll()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// One-time binding of the host swap routine
    pub fn register_present_callback(&mut self, callback: Box<dyn PresentCallback>) {
        self.pipeline.set_present_callback(callback);
    }

    /// Handle for a host thread other than this one
    ///
    /// Creating a new handle disconnects any earlier one.
    pub fn host_handle(&mut self) -> HostHandle {
        let (handle, inbox) = host::channel();
        self.inbox = Some(inbox);
        handle
    }

    pub fn notify_resize(&mut self, width: u32, height: u32) {
        match ScreenGeometry::new(width, height) {
            Some(screen) => {
                info!("physical screen resolution is {}x{}", width, height);
                self.pipeline.set_screen(screen);
            }
            None => warn!("ignoring resize to {}x{}", width, height),
        }
    }

    pub fn notify_shutdown(&mut self) {
        info!("quitting...");
        self.events.push(Event::Quit);
    }

    pub fn notify_pointer(&mut self, x: i32, y: i32, action: i32) {
        let event = match PointerAction::try_from(action) {
            Ok(PointerAction::Down) => Event::MouseButton {
                state: KeyState::Pressed,
                button: 1,
                x,
                y,
            },
            Ok(PointerAction::Up) => Event::MouseButton {
                state: KeyState::Released,
                button: 1,
                x,
                y,
            },
            Ok(PointerAction::Move) => Event::MouseMotion { x, y },
            Err(raw) => {
                debug!("unknown pointer action {}", raw);
                return;
            }
        };
        self.events.push(event);
    }

    pub fn notify_key(&mut self, keycode: i32, action: i32) {
        let code = Keycode::from_raw(keycode);
        let state = KeyState::from_action(action);
        let unicode = self.translate_unicode;

        let events = &mut self.events;
        let consumed = self
            .keys
            .filter(code, state, |transition| {
                events.push(key_event(transition, unicode));
            });
        if !consumed {
            self.events.push(Event::Key {
                state,
                keysym: keymap::translate(code, unicode),
            });
        }
    }

    fn drain_host(&mut self) {
        let Some(inbox) = self.inbox.take() else {
            return;
        };
        let messages: Vec<HostMessage> = inbox.pending().collect();
        self.inbox = Some(inbox);

        for message in messages {
            self.dispatch(message);
        }
    }

    /// Route one host message to its entry point
    pub fn dispatch(&mut self, message: HostMessage) {
        match message {
            HostMessage::Resize { width, height } => self.notify_resize(width, height),
            HostMessage::Shutdown => self.notify_shutdown(),
            HostMessage::Pointer { x, y, action } => self.notify_pointer(x, y, action),
            HostMessage::Key { keycode, action } => self.notify_key(keycode, action),
        }
    }

    pub fn pipeline(&self) -> &PresentationPipeline<R> {
        &self.pipeline
    }

    pub fn renderer(&self) -> &R {
        self.pipeline.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.pipeline.renderer_mut()
    }
}

fn key_event(transition: Transition, unicode: bool) -> Event {
    Event::Key {
        state: transition.state,
        keysym: keymap::translate(transition.direction.keycode(), unicode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RendererError;
    use crate::core::keymap::Key;
    use crate::core::renderer::DrawRect;
    use crate::core::texture::{CropRect, TextureDescriptor, TextureId};

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn configure_viewport(&mut self, _width: u32, _height: u32) {}
        fn create_texture(&mut self, _desc: &TextureDescriptor) -> Result<TextureId, RendererError> {
            Ok(TextureId(1))
        }
        fn upload_texture(&mut self, _t: TextureId, _w: u32, _h: u32, _p: &[u8]) -> Result<(), RendererError> {
            Ok(())
        }
        fn set_crop_rect(&mut self, _texture: TextureId, _crop: CropRect) {}
        fn draw_texture(&mut self, _texture: TextureId, _dest: DrawRect) -> Result<(), RendererError> {
            Ok(())
        }
        fn delete_texture(&mut self, _texture: TextureId) {}
    }

    fn device(delay: u32) -> VideoDevice<NullRenderer> {
        let config = DriverConfig {
            key_repeat_delay: delay,
            frame_delay_ms: 0,
            ..DriverConfig::default()
        };
        VideoDevice::new(NullRenderer, &config)
    }

    #[test]
    fn test_mode_list_seeded_from_screen() {
        let mut device = device(0);
        device.notify_resize(480, 800);
        let format = device.video_init();

        let modes: Vec<_> = device
            .list_modes(&format, VideoFlags::empty())
            .iter()
            .map(|r| (r.width, r.height))
            .collect();
        assert_eq!(modes, vec![(480, 800), (640, 480), (320, 240), (320, 200)]);
    }

    #[test]
    fn test_mode_list_empty_for_other_depths() {
        let mut device = device(0);
        device.video_init();
        let format = PixelFormat::for_depth(32).unwrap();
        assert!(device.list_modes(&format, VideoFlags::empty()).is_empty());
    }

    #[test]
    fn test_quit_clears_modes() {
        let mut device = device(0);
        let format = device.video_init();
        device.video_quit();
        assert!(device.list_modes(&format, VideoFlags::empty()).is_empty());
    }

    #[test]
    fn test_resize_ignores_zero() {
        let mut device = device(0);
        device.notify_resize(0, 100);
        assert_eq!(device.pipeline().screen(), ScreenGeometry::DEFAULT);
    }

    #[test]
    fn test_pointer_events() {
        let mut device = device(0);
        device.notify_pointer(5, 6, 0);
        device.notify_pointer(7, 8, 2);
        device.notify_pointer(9, 10, 1);
        device.notify_pointer(0, 0, 42);

        assert_eq!(
            device.poll_event(),
            Some(Event::MouseButton { state: KeyState::Pressed, button: 1, x: 5, y: 6 })
        );
        assert_eq!(device.poll_event(), Some(Event::MouseMotion { x: 7, y: 8 }));
        assert_eq!(
            device.poll_event(),
            Some(Event::MouseButton { state: KeyState::Released, button: 1, x: 9, y: 10 })
        );
        assert_eq!(device.poll_event(), None);
    }

    #[test]
    fn test_shutdown_queues_quit() {
        let mut device = device(0);
        device.notify_shutdown();
        assert_eq!(device.poll_event(), Some(Event::Quit));
    }

    #[test]
    fn test_back_key_translates_to_escape() {
        let mut device = device(5);
        device.notify_key(Keycode::BACK.0 as i32, 1);
        match device.poll_event() {
            Some(Event::Key { state, keysym }) => {
                assert_eq!(state, KeyState::Pressed);
                assert_eq!(keysym.sym, Key::Escape);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_stubs_report_success() {
        let mut device = device(0);
        assert!(device.set_colors(0, &[Color { r: 1, g: 2, b: 3 }]));
        let cursor = device.create_cursor(&[], &[], 16, 16, 0, 0);
        assert!(device.show_cursor(Some(&cursor)));
        device.warp_cursor(1, 1);
        device.move_cursor(2, 2);
        device.free_cursor(cursor);
        assert_eq!(device.alloc_hw_surface(8, 8), Err(VideoError::HardwareSurfaceUnsupported));
        assert_eq!(device.lock_hw_surface(), Ok(()));
    }

    #[test]
    fn test_flip_before_mode_does_not_tick() {
        let mut device = device(2);
        device.notify_key(Keycode::DPAD_UP.0 as i32, 0);
        device.flip().unwrap();
        device.flip().unwrap();
        assert_eq!(device.pending_events(), 0);
    }
}

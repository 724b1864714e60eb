use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use android_video::cli::Cli;
use android_video::config::DriverConfig;
use android_video::core::{Event, HostMessage, Key, KeyState, VideoDevice, WgpuRenderer, WinitInput};
use android_video::demo::Pattern;

type Device = VideoDevice<WgpuRenderer>;

struct App {
    cli: Cli,
    config: DriverConfig,
    window: Option<Arc<Window>>,
    device: Option<Device>,
    input: WinitInput,
    pattern: Pattern,
    frame: u32,
}

impl App {
    fn new(cli: Cli, config: DriverConfig) -> Self {
        let pattern = Pattern::new(cli.width, cli.height);
        Self {
            cli,
            config,
            window: None,
            device: None,
            input: WinitInput::new(),
            pattern,
            frame: 0,
        }
    }

    /// Bring up the device the way a host activity would: screen size, init, mode-set
    fn start_device(&self, window: Arc<Window>) -> Result<Device> {
        let size = window.inner_size();
        let renderer = WgpuRenderer::new(window).context("Failed to initialize renderer")?;
        let presenter = renderer.presenter();

        let mut device = VideoDevice::new(renderer, &self.config);
        device.register_present_callback(Box::new(presenter));
        device.notify_resize(size.width, size.height);

        let format = device.video_init();
        for mode in device.list_modes(&format, self.cli.video_flags()) {
            debug!("mode {}x{}", mode.width, mode.height);
        }

        let surface = device
            .set_mode(self.cli.width, self.cli.height, self.cli.bpp, self.cli.video_flags())
            .context("Failed to set video mode")?;
        info!(
            "video mode {}x{} at {} bpp, flags {:?}",
            surface.width, surface.height, surface.format.bits_per_pixel, surface.flags
        );
        Ok(device)
    }

    fn redraw(&mut self) -> Result<()> {
        let Some(device) = self.device.as_mut() else {
            return Ok(());
        };

        if let Some(pitch) = device.surface().map(|s| s.pitch) {
            if let Some(pixels) = device.pixels_mut() {
                self.pattern.draw(pixels, pitch, self.frame);
            }
        }
        self.frame = self.frame.wrapping_add(1);

        device.flip()?;
        Ok(())
    }

    /// Drain queued events; returns true once the application should quit
    fn handle_events(&mut self) -> bool {
        let Some(device) = self.device.as_mut() else {
            return false;
        };

        let mut quit = false;
        while let Some(event) = device.poll_event() {
            match event {
                Event::Quit => quit = true,
                Event::Key {
                    state: KeyState::Pressed,
                    keysym,
                } if keysym.sym == Key::Escape => {
                    device.notify_shutdown();
                }
                Event::MouseButton { x, y, .. } | Event::MouseMotion { x, y } => {
                    self.pattern.set_marker(x, y);
                }
                Event::Key { state, keysym } => debug!("key {:?} {:?}", keysym.sym, state),
            }
        }
        quit
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(device) = self.device.as_mut() {
            device.video_quit();
        }
        self.device = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let screen = self.config.screen();
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Android Video")
                    .with_inner_size(winit::dpi::PhysicalSize::new(screen.width, screen.height)),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let device = match self.start_device(window.clone()) {
                Ok(device) => device,
                Err(e) => {
                    error!("{:#}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.window = Some(window);
            self.device = Some(device);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(message), Some(device)) = (self.input.process_event(&event), self.device.as_mut()) {
            if let HostMessage::Resize { width, height } = message {
                device.renderer_mut().resize(width, height);
            }
            device.dispatch(message);
        }

        if let WindowEvent::RedrawRequested = event {
            if let Err(e) = self.redraw() {
                error!("Flip error: {}", e);
            }
        }

        if self.handle_events() {
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.driver_config()?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, config);

    info!("Android Video - arrows act as the trackball, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}

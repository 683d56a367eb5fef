use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::clock::{ClockSource, FrameClock, SystemClock};
use crate::config::{Config, WindowConfig};
use crate::game::{Game, TickOutcome};
use crate::input::{KeyBindings, KeyState, QuitSignal};
use crate::renderer::{FrameBuffer, Rgb, Surface};
use crate::world::GridMap;

mod camera;
mod clock;
mod config;
mod game;
mod input;
mod motion;
mod raycast;
mod renderer;
mod world;

type WindowSurface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

/// Ray-cast a grid map in first person.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON map file, overrides the config's map
    #[arg(short, long)]
    map: Option<PathBuf>,
    /// Window width in logical pixels
    #[arg(long)]
    width: Option<u32>,
    /// Window height in logical pixels
    #[arg(long)]
    height: Option<u32>,
}

/// Draws into the CPU framebuffer and copies it to the window on present.
struct Presenter<'a> {
    frame: &'a mut FrameBuffer,
    surface: &'a mut WindowSurface,
}

impl Surface for Presenter<'_> {
    type Error = softbuffer::SoftBufferError;

    fn width(&self) -> usize {
        self.frame.width()
    }

    fn height(&self) -> usize {
        self.frame.height()
    }

    fn clear(&mut self, ceiling: Rgb, floor: Rgb) {
        self.frame.clear(ceiling, floor);
    }

    fn draw_vertical_line(&mut self, x: usize, y_start: usize, y_end: usize, color: Rgb) {
        self.frame.draw_vertical_line(x, y_start, y_end, color);
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        let mut buf = self.surface.buffer_mut()?;
        let n = buf.len().min(self.frame.pixels.len());
        buf[..n].copy_from_slice(&self.frame.pixels[..n]);
        buf.present()
    }
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<WindowSurface>,
    window_config: WindowConfig,
    game: Game,
    frame: FrameBuffer,
    keys: KeyState,
    clock: SystemClock,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,
}

impl App {
    fn new(window_config: WindowConfig, game: Game, clock: SystemClock) -> Self {
        let frame = FrameBuffer::new(
            window_config.width as usize,
            window_config.height as usize,
        );
        Self {
            window: None,
            surface: None,
            window_config,
            game,
            frame,
            keys: KeyState::new(KeyBindings::default()),
            clock,
            frame_counter: 0,
            last_fps_print: Instant::now(),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.window_config.width as f64,
                self.window_config.height as f64,
            ));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| anyhow::anyhow!("create window: {e}"))?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

        let size = window.inner_size();
        self.frame.resize(size.width as usize, size.height as usize);
        log::info!(
            "window {}x{}, fov {:.1} degrees",
            size.width,
            size.height,
            self.game.camera.fov_x_degrees()
        );

        self.surface = Some(surface);
        self.window = Some(window.clone());
        window.request_redraw();
        Ok(())
    }

    fn log_fps(&mut self) {
        self.frame_counter += 1;
        let now = Instant::now();
        let secs = now.duration_since(self.last_fps_print).as_secs_f32();
        if secs >= 1.0 {
            log::info!("FPS: {:.1}", self.frame_counter as f32 / secs);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                log::error!("{e:#}");
                event_loop.exit();
                return;
            }
        }
        self.game.clock.restart(self.clock.now_millis());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.keys.request_quit();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.keys.press(code),
                ElementState::Released => self.keys.release(code),
            },

            WindowEvent::RedrawRequested => {
                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    // Minimized window, skip drawing
                    log::debug!("skipping frame for zero-sized window");
                    if self.keys.quit_requested() {
                        event_loop.exit();
                    }
                    return;
                };

                if let Err(e) = surface.resize(w, h) {
                    log::error!("surface resize failed: {e}");
                    return;
                }
                self.frame.resize(size.width as usize, size.height as usize);

                let mut presenter = Presenter {
                    frame: &mut self.frame,
                    surface,
                };
                match self.game.tick(&self.keys, &self.clock, &mut presenter) {
                    Ok(TickOutcome::Continue) => {}
                    Ok(TickOutcome::Quit) => {
                        log::info!("quitting");
                        event_loop.exit();
                        return;
                    }
                    Err(e) => {
                        log::error!("present failed: {e}");
                        event_loop.exit();
                        return;
                    }
                }

                window.request_redraw();
                self.log_fps();
            }

            WindowEvent::Resized(new_size) => {
                log::debug!("resized to {}x{}", new_size.width, new_size.height);
                self.frame
                    .resize(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(map) = args.map {
        config.map = Some(map);
    }
    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }

    let map = match &config.map {
        Some(path) => {
            GridMap::load(path).with_context(|| format!("loading map {}", path.display()))?
        }
        None => GridMap::builtin(),
    };
    log::info!("map {}x{}", map.width(), map.height());

    let clock = SystemClock::new();
    let game = Game::new(
        map,
        config.camera.build(),
        config.motion.controller(),
        FrameClock::new(clock.now_millis(), config.motion.max_frame_seconds),
        config.colors.ceiling(),
        config.colors.floor(),
    )
    .context("invalid camera start")?;

    let event_loop = EventLoop::new().map_err(|e| anyhow::anyhow!("event loop: {e}"))?;
    // Poll keeps redrawing even when no input arrives.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config.window, game, clock);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("event loop: {e}"))?;
    Ok(())
}

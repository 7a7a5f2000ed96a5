//! Deformed: a first-person horror walk through an abandoned toy factory.
//!
//! Evade the Deformed, gather the lore they left behind, and scavenge parts
//! for crafting.

mod collectible;
mod config;
mod crafting;
mod deformed;
mod engine;
mod error;
mod events;
mod factory;
mod level;
mod lore;
mod performance;
mod player;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Fullscreen, Window, WindowId},
};

use engine_core::Time;
use input::InputSampler;
use renderer::HeadlessSurface;

use config::GameConfig;
use engine::GameEngine;
use ui::HudState;

type Engine = GameEngine<HeadlessSurface, HudState>;

/// Everything owned by a running window.
pub(crate) struct GameState {
    window: Arc<Window>,
    config: GameConfig,
    input: InputSampler,
    engine: Engine,
    time: Time,
    /// A cursor grab has been asked for and not yet released or refused.
    cursor_requested: bool,
    last_title: String,
    running: bool,
}

impl GameState {
    fn new(window: Arc<Window>, config: GameConfig) -> Self {
        let mut engine = Engine::new(&config, HeadlessSurface::new(), HudState::new());
        let size = window.inner_size();
        engine.resize(size.width, size.height);
        Self {
            window,
            config,
            input: InputSampler::new(),
            engine,
            time: Time::new(),
            cursor_requested: false,
            last_title: String::new(),
            running: true,
        }
    }

    /// Throw the session away and start over.
    pub(crate) fn restart(&mut self) {
        log::info!("Restarting session");
        self.engine = Engine::new(&self.config, HeadlessSurface::new(), HudState::new());
        let size = self.window.inner_size();
        self.engine.resize(size.width, size.height);
        self.time = Time::new();
        self.input.reset();
    }

    /// One displayed frame.
    pub(crate) fn update(&mut self) {
        self.time.update();
        self.engine.frame(&mut self.input, self.time.elapsed_millis());

        let title = self.engine.ui().title_line();
        if title != self.last_title {
            self.window.set_title(&title);
            self.last_title = title;
        }
    }

    /// Capture the cursor for mouse look. A refused grab clears the request
    /// so the next click tries again.
    pub(crate) fn grab_cursor(&mut self) {
        if self.cursor_requested {
            return;
        }
        self.cursor_requested = true;
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                self.window.set_cursor_visible(false);
                self.input.set_cursor_locked(true);
            }
            Err(e) => {
                log::warn!("Cursor grab refused: {}", e);
                self.cursor_requested = false;
            }
        }
    }

    pub(crate) fn release_cursor(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.input.set_cursor_locked(false);
        self.cursor_requested = false;
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Deformed")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height))
                .with_fullscreen(config.fullscreen.then_some(Fullscreen::Borderless(None)));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.state = Some(GameState::new(window.clone(), config));
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("+--------------------------------------------------------------+");
    println!("|                          DEFORMED                            |");
    println!("+--------------------------------------------------------------+");
    println!("|  WASD        - Move          |  Mouse      - Look around     |");
    println!("|  Click       - Capture mouse |  Escape     - Release mouse   |");
    println!("|  E           - Inventory     |  1-5        - Craft (in inv.) |");
    println!("|  Enter/Space - Close lore    |  R          - Restart (dead)  |");
    println!("|  Ctrl+4      - Toggle low-performance mode                   |");
    println!("+--------------------------------------------------------------+");

    log::info!("Starting Deformed");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}

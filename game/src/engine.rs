use std::time::{Duration, Instant};

use aedventure::{GameConfig, InputState};
use anyhow::Result;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

use crate::renderer::Renderer;

/// Upper bound on simulation steps caught up in one wake-up.
const MAX_CATCH_UP_STEPS: u32 = 5;

/// Window and loop settings taken from the game configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "AEDventure".into(),
            width: 1280,
            height: 720,
            fps: 60,
        }
    }
}

impl From<&GameConfig> for EngineConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            fps: config.fps,
        }
    }
}

/// Owns the window and drives a [`Game`] at a fixed tick rate.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the provided game until the window is closed or the game requests exit.
    pub fn run<G: Game + 'static>(self, mut game: G) -> Result<()> {
        let config = self.config;

        let event_loop = EventLoop::new()?;
        let mut window_attributes = Window::default_attributes();
        window_attributes.title = config.title.clone();
        window_attributes.inner_size = Some(LogicalSize::new(config.width, config.height).into());
        let window = event_loop.create_window(window_attributes)?;

        // The window lives until the process exits; leaking it gives the
        // framebuffer a 'static surface.
        let window: &'static Window = Box::leak(Box::new(window));

        let mut ctx = EngineContext::new(window, &config)?;
        game.init(&mut ctx)?;
        log::info!(
            "engine running at {} ticks/s, framebuffer {}x{}",
            config.fps.max(1),
            config.width,
            config.height
        );

        let mut last_frame = Instant::now();
        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                ctx.handle_window_event(&event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = ctx.resize_renderer(new_size) {
                            log::error!("failed to resize framebuffer: {err:?}");
                            elwt.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = game.draw(&mut ctx) {
                            log::error!("encountered error during draw: {err:?}");
                            elwt.exit();
                            return;
                        }
                        if ctx.exit_requested {
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                let now = Instant::now();
                ctx.update_time(now - last_frame);
                last_frame = now;

                let mut stepped = false;
                while ctx.should_run_fixed_update() {
                    if let Err(err) = game.update(&mut ctx) {
                        log::error!("encountered error during update: {err:?}");
                        elwt.exit();
                        return;
                    }
                    ctx.end_step();
                    stepped = true;
                }

                if ctx.exit_requested {
                    elwt.exit();
                    return;
                }
                if stepped {
                    ctx.window.request_redraw();
                }
                elwt.set_control_flow(ControlFlow::WaitUntil(now + ctx.fixed_delta_time));
            }
            _ => {}
        })?;

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared context provided to game code each tick.
pub struct EngineContext {
    window: &'static Window,
    fixed_delta_time: Duration,
    fixed_time_accumulator: Duration,
    simulation_time: Duration,
    exit_requested: bool,
    input: InputState,
    renderer: Renderer,
}

impl EngineContext {
    fn new(window: &'static Window, config: &EngineConfig) -> Result<Self> {
        let renderer = Renderer::new(window, config.width, config.height)?;
        Ok(Self {
            window,
            fixed_delta_time: Duration::from_secs_f64(1.0 / f64::from(config.fps.max(1))),
            fixed_time_accumulator: Duration::ZERO,
            simulation_time: Duration::ZERO,
            exit_requested: false,
            input: InputState::new(),
            renderer,
        })
    }

    fn update_time(&mut self, delta: Duration) {
        self.fixed_time_accumulator =
            (self.fixed_time_accumulator + delta).min(self.fixed_delta_time * MAX_CATCH_UP_STEPS);
    }

    fn should_run_fixed_update(&mut self) -> bool {
        if self.fixed_time_accumulator >= self.fixed_delta_time {
            self.fixed_time_accumulator -= self.fixed_delta_time;
            true
        } else {
            false
        }
    }

    /// Close out one simulation step. Presses are consumed by the first step
    /// that sees them.
    fn end_step(&mut self) {
        self.simulation_time += self.fixed_delta_time;
        self.input.begin_frame();
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.input.handle_key(event),
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.handle_mouse_button(*button, *state)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.renderer.window_to_framebuffer(position.x, position.y);
                self.input.handle_cursor_moved(x, y)
            }
            _ => {}
        }
    }

    fn resize_renderer(&mut self, new_size: PhysicalSize<u32>) -> Result<()> {
        self.renderer.resize(new_size.width, new_size.height)
    }

    /// Simulated time since the first tick; advances by a fixed step.
    pub fn simulation_time(&self) -> Duration {
        self.simulation_time
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Request that the engine exit after the current tick.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn renderer(&mut self) -> &mut Renderer {
        &mut self.renderer
    }
}

/// Trait implemented by the game to hook into the engine lifecycle.
pub trait Game {
    /// Called once after the window is created but before the first tick.
    fn init(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Advance the simulation by one fixed step.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Present the most recent frame.
    fn draw(&mut self, ctx: &mut EngineContext) -> Result<()>;
}

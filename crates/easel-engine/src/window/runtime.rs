use std::cell::RefCell;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::backend::WindowConfig;
use crate::device::{FrameOutcome, Gpu, GpuInit};
use crate::error::CanvasError;
use crate::input::platform::winit::translate_window_event;
use crate::input::InputState;
use crate::render::{RenderCtx, RenderTarget, Viewport};

/// Pumps attempted while waiting for the platform to hand out a window.
const STARTUP_PUMPS: usize = 200;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

thread_local! {
    // winit allows one EventLoop per process; a closed window leaves it here
    // for the next open.
    static PARKED_EVENT_LOOP: RefCell<Option<EventLoop<()>>> = const { RefCell::new(None) };
}

/// Returns the parked loop and whether it has already been resumed.
fn acquire_event_loop() -> Result<(EventLoop<()>, bool)> {
    if let Some(event_loop) = PARKED_EVENT_LOOP.with_borrow_mut(Option::take) {
        log::debug!("reusing event loop");
        return Ok((event_loop, true));
    }
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    Ok((event_loop, false))
}

fn park_event_loop(event_loop: EventLoop<()>) {
    PARKED_EVENT_LOOP.with_borrow_mut(|slot| *slot = Some(event_loop));
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Handler {
    config: WindowConfig,
    gpu_init: GpuInit,
    entry: Option<WindowEntry>,
    input: InputState,
    close_requested: bool,
    startup_error: Option<anyhow::Error>,
    /// Windows may only be created once the platform has resumed the app.
    resumed: bool,
}

impl Handler {
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) {
        if !self.resumed || self.entry.is_some() || self.startup_error.is_some() {
            return;
        }
        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to open window: {e:#}");
            self.startup_error = Some(e);
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width as f64, self.config.height as f64))
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        self.entry = Some(entry);
        Ok(())
    }

    fn view_height(&self) -> f32 {
        self.config.height as f32
    }
}

impl ApplicationHandler for Handler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        self.resumed = true;
        self.ensure_window(event_loop);
    }

    // A reused loop is never resumed again; the window is made here instead.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.ensure_window(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let view_height = self.view_height();
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let input = &mut self.input;
        entry.with_window(|window| {
            if let Some(ev) = translate_window_event(window, view_height, &event) {
                input.apply_event(&ev);
            }
        });

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }
            _ => {}
        }
    }
}

/// A single window driven by pumping the event loop from the caller's loop.
///
/// Closing the window parks the event loop, so a later `open` on the same
/// thread gets a fresh window on the same loop.
pub struct WindowRuntime {
    event_loop: Option<EventLoop<()>>,
    handler: Handler,
    viewport: Viewport,
}

impl WindowRuntime {
    /// Creates the event loop and pumps it until the window and GPU exist.
    pub fn open(config: WindowConfig, gpu_init: GpuInit) -> Result<Self> {
        let (mut event_loop, resumed) = acquire_event_loop()?;
        let viewport = Viewport::new(config.width as f32, config.height as f32);
        let mut handler = Handler {
            config,
            gpu_init,
            entry: None,
            input: InputState::default(),
            close_requested: false,
            startup_error: None,
            resumed,
        };

        if let Err(e) = Self::pump_until_open(&mut event_loop, &mut handler) {
            handler.entry = None;
            park_event_loop(event_loop);
            return Err(e);
        }

        log::info!(
            "window {:?} opened at {}x{}",
            handler.config.title,
            handler.config.width,
            handler.config.height
        );

        Ok(Self {
            event_loop: Some(event_loop),
            handler,
            viewport,
        })
    }

    fn pump_until_open(event_loop: &mut EventLoop<()>, handler: &mut Handler) -> Result<()> {
        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), handler);
            if let Some(e) = handler.startup_error.take() {
                return Err(e);
            }
            if handler.entry.is_some() {
                return Ok(());
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited during startup (code {code})");
            }
        }
        Err(anyhow!("platform never resumed the application"))
    }

    /// Processes pending window events without blocking.
    pub fn pump_events(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler);
        if let PumpStatus::Exit(_) = status {
            self.handler.close_requested = true;
        }
    }

    pub fn close_requested(&self) -> bool {
        self.handler.close_requested
    }

    pub fn input(&self) -> &InputState {
        &self.handler.input
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Draws and presents one frame through `draw`.
    pub fn draw_frame<F>(&mut self, draw: F) -> std::result::Result<FrameOutcome, CanvasError>
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let viewport = self.viewport;
        match self.handler.entry.as_mut() {
            Some(entry) => entry.with_gpu_mut(|gpu| gpu.draw_frame(viewport, draw)),
            None => Ok(FrameOutcome::Skipped),
        }
    }
}

impl Drop for WindowRuntime {
    fn drop(&mut self) {
        // Surface before window, then let the loop observe the destruction.
        self.handler.entry = None;
        if let Some(mut event_loop) = self.event_loop.take() {
            let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler);
            park_event_loop(event_loop);
        }
        log::debug!("window closed");
    }
}

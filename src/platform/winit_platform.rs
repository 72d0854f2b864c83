//=========================================================================
// Winit Platform
//=========================================================================
//
// Desktop backend: one OS window, events pumped once per loop iteration.
//
// Architecture:
// ```text
//  open()         EventLoop::new() → pump until resumed() created the window
//                 → WindowSurface (canvas + softbuffer) over that window
//  poll_events()  pump_app_events(0ms) → WinitApp buffers SystemEvents
//                 → all of them handed to the loop
//  shutdown()     hide window, drop event loop
// ```
//
// The engine owns the loop, so winit is driven through the pump API
// instead of `run_app`. Must be used from the main thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use super::input_processor::InputProcessor;
use super::window_surface::WindowSurface;
use super::{Platform, SystemEvent};
use crate::core::config::WindowConfig;
use crate::core::input::InputEvent;
use crate::error::PlatformError;

//=== Constants ===========================================================

/// Pumps allowed for the initial `resumed()` to create the window.
const OPEN_PUMP_ATTEMPTS: usize = 16;

//=== WinitPlatform =======================================================

#[derive(Default)]
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    app: WinitApp,
}

impl WinitPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// The OS window, once opened.
    pub fn window(&self) -> Option<&Window> {
        self.app.window.as_deref()
    }
}

impl Platform for WinitPlatform {
    type Surface = WindowSurface;

    fn open(&mut self, config: &WindowConfig) -> Result<WindowSurface, PlatformError> {
        if self.event_loop.is_some() {
            return Err(PlatformError::AlreadyOpen);
        }

        debug!(target: "platform", "Creating winit event loop");
        let mut event_loop =
            EventLoop::new().map_err(|err| PlatformError::EventLoopCreation(err.to_string()))?;

        self.app.requested = Some(
            WindowAttributes::default()
                .with_title(config.title.clone())
                .with_inner_size(PhysicalSize::new(config.width, config.height))
                .with_resizable(false),
        );

        for _ in 0..OPEN_PUMP_ATTEMPTS {
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app) {
                return Err(PlatformError::SurfaceCreation(format!(
                    "event loop exited during startup (code {})",
                    code
                )));
            }
            if self.app.window.is_some() || self.app.creation_error.is_some() {
                break;
            }
        }

        if let Some(reason) = self.app.creation_error.take() {
            return Err(PlatformError::SurfaceCreation(reason));
        }
        let Some(window) = self.app.window.clone() else {
            return Err(PlatformError::SurfaceCreation("window was never created".into()));
        };

        let surface = match WindowSurface::new(window, config.width, config.height) {
            Ok(surface) => surface,
            Err(err) => {
                self.app.window = None;
                return Err(err);
            }
        };

        self.event_loop = Some(event_loop);
        Ok(surface)
    }

    fn poll_events(&mut self, events: &mut Vec<SystemEvent>) {
        if let Some(event_loop) = self.event_loop.as_mut() {
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app) {
                info!(target: "platform", "Event loop exited with code {}", code);
                self.app.pending.push(SystemEvent::Quit);
            }
        }

        events.extend(self.app.pending.drain(..));
    }

    fn shutdown(&mut self) {
        // The engine's surface still shares the window until it drops.
        if let Some(window) = self.app.window.take() {
            window.set_visible(false);
        }
        self.app.pending.clear();
        if self.event_loop.take().is_some() {
            info!(target: "platform", "Window closed, event loop released");
        }
    }
}

//=== WinitApp ============================================================

/// Winit callback target; buffers translated events between pumps.
#[derive(Debug)]
struct WinitApp {
    requested: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    creation_error: Option<String>,
    processor: InputProcessor,
    pending: Vec<SystemEvent>,
}

impl Default for WinitApp {
    fn default() -> Self {
        Self {
            requested: None,
            window: None,
            creation_error: None,
            processor: InputProcessor::new(),
            pending: Vec::new(),
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        let Some(attributes) = self.requested.take() else {
            return;
        };

        match event_loop.create_window(attributes) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(Arc::new(window));
            }
            Err(err) => {
                error!(target: "platform", "Window creation failed: {}", err);
                self.creation_error = Some(err.to_string());
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.pending.push(SystemEvent::Quit);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.processor.process_mouse_move(position.x, position.y);
                self.pending.push(event.into());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                match self.processor.process_key_event(&event) {
                    Some(input) => self.pending.push(input.into()),
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.processor.process_mouse_button(button, state);
                self.pending.push(event.into());
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.processor.process_mouse_wheel(delta);
                self.pending.push(event.into());
            }

            WindowEvent::Focused(focused) => {
                self.pending.push(InputEvent::Focused(focused).into());
            }

            _ => {}
        }
    }
}

//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Display and event backends behind one capability interface.
//
// Architecture:
// ```text
//  Engine::new()                      Engine::run() (each iteration)
//   │                                  │
//   └─ Platform::open(&WindowConfig)   ├─ Platform::poll_events(&mut Vec)
//        ↓                             │     → SystemEvent::Quit
//      Surface (Renderer)              │     → SystemEvent::Input(..)
//                                      │
//  cleanup ─────────────────────────── └─ Platform::shutdown()
// ```
//
// Backends:
// - `HeadlessPlatform`: channel-fed and scriptable; no OS window
// - `WinitPlatform`: desktop window, events pumped once per iteration,
//   frames shown through a `WindowSurface` (softbuffer)
//
// Every poll drains the backend completely: whatever is pending when the
// iteration starts (a Quit included) is handled in that iteration.
//
//=========================================================================

//=== Module Declarations =================================================

mod headless;

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod input_processor;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod window_surface;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod winit_platform;

//=== Public API ==========================================================

pub use headless::{EventInjector, HeadlessPlatform};

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use window_surface::WindowSurface;
#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use winit_platform::WinitPlatform;

use crate::core::config::WindowConfig;
use crate::core::input::InputEvent;
use crate::core::render::Renderer;
use crate::error::PlatformError;

//=== SystemEvent =========================================================

/// Event produced by a platform backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    /// Window closed or shutdown requested by the OS.
    Quit,

    /// Anything for the input system.
    Input(InputEvent),
}

impl From<InputEvent> for SystemEvent {
    fn from(event: InputEvent) -> Self {
        Self::Input(event)
    }
}

//=== Platform ============================================================

/// Display/event backend owned by the engine.
pub trait Platform {
    /// Render surface acquired at `open`.
    type Surface: Renderer;

    /// Acquires the display surface. Failure is fatal to construction.
    fn open(&mut self, window: &WindowConfig) -> Result<Self::Surface, PlatformError>;

    /// Appends every pending event, in arrival order.
    fn poll_events(&mut self, events: &mut Vec<SystemEvent>);

    /// Releases the display. Called once, after audio teardown.
    fn shutdown(&mut self);
}

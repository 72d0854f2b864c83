//=========================================================================
// Core Systems
//=========================================================================
//
// Collaborator contracts driven by the frame loop, plus their default
// implementations.
//
// Responsibilities:
// - `time`: clocks, frame accounting and rate limiting
// - `input`: event queue and per-frame input state
// - `scene`: scene stack with deferred transitions
// - `audio`: mixer facade over a pluggable device
// - `render`: draw targets and the software framebuffer
// - `resources`: asset cache rooted at the assets folder
// - `config`: serde-backed engine configuration
//
// Each subsystem exposes one trait the loop calls through
// (`InputSystem`, `SceneSystem`, `AudioSystem`, `Renderer`), so any of
// them can be swapped at construction.
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod audio;
pub mod config;
pub mod input;
pub mod render;
pub mod resources;
pub mod scene;
pub mod time;

//--- Collaborator Contracts ----------------------------------------------

pub use audio::AudioSystem;
pub use input::InputSystem;
pub use render::{RenderTarget, Renderer};
pub use scene::SceneSystem;
pub use time::FrameClock;

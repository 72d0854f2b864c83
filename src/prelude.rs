//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tempo_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineHandle, EngineState, Lifecycle};
pub use crate::error::{EngineError, SceneError};

// Configuration and logging
pub use crate::core::config::{AudioConfig, EngineConfig, WindowConfig};
pub use crate::logging::{init_logging, LoggingConfig};

// Input system
pub use crate::core::input::{InputEvent, InputState, InputSystem, KeyCode, Modifiers, MouseButton};

// Scene system
pub use crate::core::scene::{FrameContext, Scene, SceneContext, SceneKey, SceneManager, SceneSystem, SceneTransition};

// Audio
pub use crate::core::audio::{AudioManager, AudioSystem, Loop};

// Rendering
pub use crate::core::render::{Color, Rect, RenderTarget, Renderer, Vec2};

// Time
pub use crate::core::time::{FrameClock, FrameTime, ManualClock, SystemClock};

// Platform backends
pub use crate::platform::{HeadlessPlatform, Platform, SystemEvent};

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use crate::platform::WinitPlatform;

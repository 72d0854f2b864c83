//=========================================================================
// Scene System
//=========================================================================
//
// Scene contract consumed by the frame loop, plus the stack-based manager.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<K, Box<dyn Scene>>
//     ├─ stack: Vec<K>
//     └─ transitions: TransitionQueue<K>
//
// Flow (one iteration):
//   update() → active scenes update → apply transitions
//   render() → active scenes render, bottom-up
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod context;
mod scene_manager;
mod transition_queue;

//=== Public API ==========================================================

pub use context::{FrameContext, SceneContext};
pub use scene_manager::SceneManager;
pub use transition_queue::{SceneTransition, TransitionQueue};

use crate::core::render::RenderTarget;
use crate::error::SceneError;

//=== SceneSystem =========================================================

/// Scene collaborator driven by the engine loop.
pub trait SceneSystem {
    /// Advances scene logic by `frame.time.delta_time`.
    fn update(&mut self, frame: &FrameContext<'_>) -> Result<(), SceneError>;

    /// Draws the current state. Takes `&self`: rendering never mutates.
    fn render(&self, target: &mut dyn RenderTarget) -> Result<(), SceneError>;
}

//=== SceneKey ============================================================

/// Marker trait for scene identifiers, usually a game-specific enum.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

/// Key for a manager with no scenes.
impl SceneKey for () {}

//=== Scene ===============================================================

/// Scene behavior with lifecycle hooks.
///
/// Only `update()` is required:
///
/// ```rust
/// # use tempo_engine::prelude::*;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameScene { Main }
/// impl SceneKey for GameScene {}
///
/// struct MainScene;
///
/// impl Scene<GameScene> for MainScene {
///     fn update(&mut self, ctx: &mut SceneContext<'_, GameScene>) -> Result<(), SceneError> {
///         if ctx.input().is_key_pressed(KeyCode::Escape) {
///             ctx.engine().stop();
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Scene<K: SceneKey> {
    /// Called when the scene enters the stack.
    fn on_enter(&mut self) {}

    /// Called when the scene leaves the stack.
    fn on_exit(&mut self) {}

    /// Called every iteration while the scene is active.
    fn update(&mut self, ctx: &mut SceneContext<'_, K>) -> Result<(), SceneError>;

    fn render(&self, _target: &mut dyn RenderTarget) -> Result<(), SceneError> {
        Ok(())
    }

    /// Whether scenes below this one keep updating and rendering.
    ///
    /// Transparent scenes (pause menus, HUD overlays) let the stack below
    /// show through; opaque scenes hide it.
    fn is_transparent(&self) -> bool {
        false
    }
}

//=========================================================================
// Input System
//=========================================================================
//
// Input contract consumed by the frame loop, plus the default manager.
//
// Per iteration the loop calls `handle_event` once for every non-quit
// event (arrival order), then `update` exactly once before the scene
// update. Queries go through the read-only `InputState`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod input_manager;
mod input_state;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_manager::InputManager;
pub use input_state::InputState;

//=== InputSystem =========================================================

/// Input collaborator driven by the engine loop.
pub trait InputSystem {
    /// Ingests one platform event. Unknown events are ignored, never an error.
    fn handle_event(&mut self, event: &InputEvent);

    /// Advances the input state once all of the frame's events are in.
    fn update(&mut self);

    /// Snapshot queried by scenes during their update.
    fn state(&self) -> &InputState;
}

//=========================================================================
// Input Manager
//=========================================================================
//
// Default `InputSystem` implementation.
//
// Events handed over by the loop are queued, then applied in arrival order
// when the frame's `update()` runs. Scenes updated afterwards observe a
// state that reflects every event of the current frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::InputEvent;
use super::input_state::InputState;
use super::InputSystem;

//=== InputManager ========================================================

#[derive(Debug, Default)]
pub struct InputManager {
    pending: Vec<InputEvent>,
    state: InputState,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received since the last `update()`.
    pub fn pending(&self) -> &[InputEvent] {
        &self.pending
    }
}

impl InputSystem for InputManager {
    fn handle_event(&mut self, event: &InputEvent) {
        if matches!(event, InputEvent::Unidentified) {
            return;
        }
        self.pending.push(event.clone());
    }

    fn update(&mut self) {
        self.state.begin_frame();

        if !self.pending.is_empty() {
            trace!(target: "platform::input", "Applying {} input events", self.pending.len());
        }

        for event in self.pending.drain(..) {
            self.state.apply(&event);
        }

        self.state.end_frame();
    }

    fn state(&self) -> &InputState {
        &self.state
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, MouseButton};

    #[test]
    fn events_are_deferred_until_update() {
        let mut input = InputManager::new();

        input.handle_event(&InputEvent::key_down(KeyCode::Enter));
        assert!(!input.state().is_key_down(KeyCode::Enter));
        assert_eq!(input.pending().len(), 1);

        input.update();
        assert!(input.state().is_key_pressed(KeyCode::Enter));
        assert!(input.pending().is_empty());
    }

    #[test]
    fn events_apply_in_arrival_order() {
        let mut input = InputManager::new();

        input.handle_event(&InputEvent::button_down(MouseButton::Left));
        input.handle_event(&InputEvent::button_up(MouseButton::Left));
        input.handle_event(&InputEvent::button_down(MouseButton::Left));
        input.update();

        assert!(input.state().is_button_down(MouseButton::Left));
        assert!(input.state().is_button_pressed(MouseButton::Left));
        assert!(input.state().is_button_released(MouseButton::Left));
    }

    #[test]
    fn unidentified_events_are_dropped() {
        let mut input = InputManager::new();
        input.handle_event(&InputEvent::Unidentified);
        assert!(input.pending().is_empty());
        input.update();
    }

    #[test]
    fn update_without_events_clears_frame_transitions() {
        let mut input = InputManager::new();

        input.handle_event(&InputEvent::key_down(KeyCode::KeyZ));
        input.update();
        input.update();

        assert!(input.state().is_key_down(KeyCode::KeyZ));
        assert!(!input.state().is_key_pressed(KeyCode::KeyZ));
    }
}

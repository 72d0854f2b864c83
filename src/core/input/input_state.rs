//=========================================================================
// Input State
//=========================================================================
//
// Low-level input state with per-frame deltas.
//
// Architecture:
//   InputEvent → apply() → HashSets (held) + frame deltas → query
//
// Frame lifecycle: begin_frame() → apply()* → end_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputState ==========================================================

/// Persistent input state (what is held) plus this frame's transitions.
#[derive(Debug, Clone)]
pub struct InputState {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),
    modifiers: Modifiers,
    focused: bool,

    //--- Frame Deltas (reset by begin_frame) -----------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    wheel: (f32, f32),

    //--- Derived ---------------------------------------------------------
    mouse_delta: (f32, f32),
    frame_start_position: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            mouse_position: (0.0, 0.0),
            modifiers: Modifiers::NONE,
            focused: true,
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            buttons_pressed: HashSet::new(),
            buttons_released: HashSet::new(),
            wheel: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            frame_start_position: (0.0, 0.0),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Drops the previous frame's transitions.
    pub(super) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel = (0.0, 0.0);
        self.frame_start_position = self.mouse_position;
    }

    /// Applies one event. Unknown events are ignored.
    pub(super) fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers, repeat } => {
                self.modifiers = *modifiers;
                // Repeats and already-held keys are not fresh presses.
                if self.keys_down.insert(*key) && !*repeat {
                    self.keys_pressed.insert(*key);
                }
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                if self.keys_down.remove(key) {
                    self.keys_released.insert(*key);
                }
            }

            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }

            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }

            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = (*x, *y);
            }

            InputEvent::MouseWheel { x, y } => {
                self.wheel.0 += x;
                self.wheel.1 += y;
            }

            InputEvent::Focused(focused) => {
                self.focused = *focused;
                if !focused {
                    self.release_all();
                }
            }

            InputEvent::Unidentified => {}
        }
    }

    /// Computes derived values once all events of the frame are applied.
    pub(super) fn end_frame(&mut self) {
        self.mouse_delta = (
            self.mouse_position.0 - self.frame_start_position.0,
            self.mouse_position.1 - self.frame_start_position.1,
        );
    }

    // Losing focus means key-up events will never arrive.
    fn release_all(&mut self) {
        self.keys_released.extend(self.keys_down.drain());
        self.buttons_released.extend(self.buttons_down.drain());
        self.modifiers = Modifiers::NONE;
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// `true` only on the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` only on the frame the key went up.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Cursor position in window pixels.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Cursor movement during the last frame.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Accumulated scroll during the last frame.
    pub fn wheel_delta(&self) -> (f32, f32) {
        self.wheel
    }

    //=====================================================================
    // Query API - Misc
    //=====================================================================

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

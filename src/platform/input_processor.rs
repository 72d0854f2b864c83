//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit window events into engine InputEvents.
//
// Architecture:
//   WindowEvent → InputProcessor → InputEvent → SystemEvent::Input
//
// Modifier state from ModifiersChanged is cached and stamped onto every
// later key/mouse event. Unmapped keys (F13-F24, media keys) are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== Constants ===========================================================

/// Pixel-precise scroll (touchpads) is reported in lines of this height.
const PIXELS_PER_LINE: f32 = 20.0;

//=== InputProcessor ======================================================

/// Converts winit events to engine InputEvents with stateful modifier tracking.
#[derive(Debug)]
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    #[cfg(test)]
    fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    //--- Event Processing -------------------------------------------------

    /// Converts winit KeyEvent to InputEvent (filters unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key_code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key_code, KeyCode::Unidentified) {
            return None;
        }

        Some(self.create_key_input_event(key_code, key_event.state, key_event.repeat))
    }

    /// Converts winit mouse button event to InputEvent (with modifiers).
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let mouse_button = MouseButton::from(button);

        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown {
                button: mouse_button,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => InputEvent::MouseButtonUp {
                button: mouse_button,
                modifiers: self.current_modifiers,
            },
        }
    }

    /// Creates a mouse move event (window pixels, no modifiers).
    pub(crate) fn process_mouse_move(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved { x: x as f32, y: y as f32 }
    }

    /// Converts a scroll delta to lines.
    pub(crate) fn process_mouse_wheel(&self, delta: MouseScrollDelta) -> InputEvent {
        let (x, y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(pos) => {
                (pos.x as f32 / PIXELS_PER_LINE, pos.y as f32 / PIXELS_PER_LINE)
            }
        };
        InputEvent::MouseWheel { x, y }
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_key_input_event(&self, key: KeyCode, state: ElementState, repeat: bool) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown {
                key,
                modifiers: self.current_modifiers,
                repeat,
            },
            ElementState::Released => InputEvent::KeyUp {
                key,
                modifiers: self.current_modifiers,
            },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts winit ModifiersState to engine Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, F1-F12, arrows, modifiers and common special keys.
/// Everything else (F13-F24, numpad, media keys) is `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Function Keys ------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

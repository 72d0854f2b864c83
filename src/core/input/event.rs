//=========================================================================
// Input Event Types
//=========================================================================
//
// Platform-independent representation of low-level input.
//
// Platform backends (winit, headless) translate their native events into
// these types; the input system consumes them in arrival order.
//
// Event Flow:
// ```text
// Platform backend
//       ↓
//  SystemEvent::Input(InputEvent)
//       ↓
//  InputSystem::handle_event()  (queued)
//       ↓
//  InputSystem::update()        (applied to InputState)
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// `Other` covers side, thumb and macro buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key (location, not character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    /// Key reported by the platform but not mapped by the engine.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state. Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// Returns `true` when no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// Low-level input event delivered to the input system.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
        /// OS key-repeat; does not count as a fresh press.
        repeat: bool,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Cursor position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Scroll amount in lines (positive y = away from the user).
    MouseWheel { x: f32, y: f32 },

    /// Window gained (`true`) or lost (`false`) keyboard focus.
    Focused(bool),

    /// Anything the backend could not classify. Ignored by consumers.
    Unidentified,
}

impl InputEvent {
    /// Fresh (non-repeat) key press with no modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE, repeat: false }
    }

    /// Key release with no modifiers.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// Mouse press with no modifiers.
    pub fn button_down(button: MouseButton) -> Self {
        Self::MouseButtonDown { button, modifiers: Modifiers::NONE }
    }

    /// Mouse release with no modifiers.
    pub fn button_up(button: MouseButton) -> Self {
        Self::MouseButtonUp { button, modifiers: Modifiers::NONE }
    }

    /// Modifier state carried by the event, if any.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

//! User input event types.

/// Describes, which buttons are pressed down during a mouse drag.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MouseDragSettings {
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

/// Modifier keys held down during an input event.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,

    /// The "windows" key on PC keyboards, the command key on macOS.
    pub logo: bool,
}

/// Mouse buttons
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other,
}

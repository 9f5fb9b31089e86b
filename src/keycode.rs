//! Platform virtual-key codes
//!
//! The repertoire the keyboard decoder maps functional-key codepoints into.
//! The numeric identity of these keys is a concern of whatever consumes the
//! events; only the variants are part of this crate's contract.

use serde::{Deserialize, Serialize};

/// Platform virtual-key code for a non-printable or functional key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// A key the extended protocol reported but this table does not name
    Unknown,
    Escape,
    Return,
    Tab,
    Backspace,
    Insert,
    Delete,
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Menu,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadDecimal,
    NumpadDivide,
    NumpadMultiply,
    NumpadSubtract,
    NumpadAdd,
    NumpadSeparator,
    MediaPlay,
    MediaPause,
    MediaPlayPause,
    MediaStop,
    MediaNextTrack,
    MediaPrevTrack,
    VolumeDown,
    VolumeUp,
    VolumeMute,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    LeftSuper,
    RightSuper,
}

//! SGR mouse protocol codec
//!
//! Decodes `<descriptor;x;y` CSI payloads terminated by `M`/`m` into
//! [`MouseEvent`]s and toggles the pixel-resolution reporting modes through
//! the [`ModeManager`].

use std::io::Write;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::modes::{Mode, ModeManager};
use crate::Result;

bitflags! {
    /// Buttons involved in a mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct MouseButtons: u16 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
        const FOURTH = 1 << 3;
        const FIFTH = 1 << 4;
        const SIXTH = 1 << 5;
        const SEVENTH = 1 << 6;
        const WHEEL_UP = 1 << 7;
        const WHEEL_DOWN = 1 << 8;
        const WHEEL_LEFT = 1 << 9;
        const WHEEL_RIGHT = 1 << 10;
    }
}

bitflags! {
    /// Modifier bits, sharing the wire descriptor's bit positions. `MOTION`
    /// is synthetic: it is forced on for move events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct MouseModifiers: u16 {
        const SHIFT = 1 << 2;
        const ALT = 1 << 3;
        const CTRL = 1 << 4;
        const MOTION = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseEventKind {
    #[default]
    Press,
    Release,
    Move,
}

/// A decoded mouse report. Coordinates are 1-based terminal cells, or pixels
/// when pixel-mode reporting is negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub buttons: MouseButtons,
    pub modifiers: MouseModifiers,
    pub x: i32,
    pub y: i32,
}

/// Enable pixel-resolution SGR reporting for all mouse movement.
pub fn enable<W: Write>(modes: &mut ModeManager, out: &mut W) -> Result<()> {
    modes.set_modes(out, &[Mode::MouseSgrPixel, Mode::MouseMoveTracking], true)?;
    out.flush()?;
    Ok(())
}

/// Disable the reporting modes enabled by [`enable`].
pub fn disable<W: Write>(modes: &mut ModeManager, out: &mut W) -> Result<()> {
    modes.set_modes(out, &[Mode::MouseSgrPixel, Mode::MouseMoveTracking], false)?;
    out.flush()?;
    Ok(())
}

const BUTTON_MAP: [MouseButtons; 3] = [
    MouseButtons::LEFT,
    MouseButtons::MIDDLE,
    MouseButtons::RIGHT,
];
const EXTENDED_MAP: [MouseButtons; 4] = [
    MouseButtons::FOURTH,
    MouseButtons::FIFTH,
    MouseButtons::SIXTH,
    MouseButtons::SEVENTH,
];
const WHEEL_MAP: [MouseButtons; 4] = [
    MouseButtons::WHEEL_UP,
    MouseButtons::WHEEL_DOWN,
    MouseButtons::WHEEL_LEFT,
    MouseButtons::WHEEL_RIGHT,
];

/// Decode a CSI payload (final byte included) into a mouse event, or `None`
/// when the payload is not an SGR mouse report.
pub fn mouse_event_from_csi(csi: &str) -> Option<MouseEvent> {
    let trailer = *csi.as_bytes().last()?;
    if !csi.starts_with('<') || (trailer != b'm' && trailer != b'M') {
        return None;
    }
    let body = &csi[1..csi.len() - 1];

    let mut parts = body.split(';');
    let descriptor = parts.next()?.parse::<u16>().ok()?;
    let x = parts.next()?.parse::<i32>().ok()?;
    let y = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let mut event = MouseEvent {
        x,
        y,
        ..Default::default()
    };

    if trailer == b'm' {
        event.kind = MouseEventKind::Release;
    } else if descriptor & MouseModifiers::MOTION.bits() != 0 {
        event.kind = MouseEventKind::Move;
        event.modifiers |= MouseModifiers::MOTION;
    }

    // The low two bits index a button table selected by the descriptor's
    // magnitude; index 3 below the wheel range means "no button" (moves).
    let index = usize::from(descriptor & 0b11);
    if descriptor >= 1 << 7 {
        event.buttons |= EXTENDED_MAP[index];
    } else if descriptor >= 1 << 6 {
        event.buttons |= WHEEL_MAP[index];
    } else if index < 3 {
        event.buttons |= BUTTON_MAP[index];
    }

    event.modifiers |= MouseModifiers::from_bits_truncate(descriptor)
        & (MouseModifiers::SHIFT | MouseModifiers::ALT | MouseModifiers::CTRL);

    Some(event)
}

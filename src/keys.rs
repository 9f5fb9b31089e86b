//! Kitty keyboard protocol codec
//!
//! Decodes extended keyboard-report CSI payloads into [`KeyEvent`]s and
//! toggles the reporting mode itself. The wire format is
//! `CSI key[:shifted[:base-layout]] ; mods[:event] ; alt-key trailer`, with a
//! trailer drawn from a fixed set and several legacy aliases kept for
//! compatibility with pre-extension terminals.

use std::io::Write;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::codes;
use crate::keycode::KeyCode;
use crate::Result;

bitflags! {
    /// Progressive-enhancement flags of the extended keyboard protocol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct KeyboardFlags: u8 {
        const DISAMBIGUATE_ESCAPE_CODES = 1;
        const REPORT_EVENT_TYPES = 2;
        const REPORT_ALTERNATE_KEYS = 4;
        const REPORT_ALL_KEYS_AS_ESCAPE_CODES = 8;
        const REPORT_ASSOCIATED_TEXT = 16;
    }
}

bitflags! {
    /// Modifier bitmask as reported on the wire (field value minus one).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct KeyModifiers: u16 {
        const SHIFT = 1;
        const ALT = 2;
        const CTRL = 4;
        const SUPER = 8;
        const HYPER = 16;
        const META = 32;
        const CAPS_LOCK = 64;
        const NUM_LOCK = 128;
    }
}

/// Key transition reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyEventKind {
    #[default]
    Down,
    Repeat,
    Up,
}

impl KeyEventKind {
    fn from_wire(value: u32) -> Self {
        match value {
            2 => KeyEventKind::Repeat,
            3 => KeyEventKind::Up,
            _ => KeyEventKind::Down,
        }
    }
}

/// A decoded keyboard report.
///
/// Exactly one of `key_code` and `key` is populated for a resolvable key:
/// functional keys land in `key_code`, everything else is a literal Unicode
/// codepoint in `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    /// Platform virtual-key code, for functional keys
    pub key_code: Option<KeyCode>,
    /// Unicode codepoint, for keys with no platform mapping
    pub key: Option<u32>,
    /// Codepoint the key produces with shift held (0 when unreported)
    pub shifted_key: u32,
    /// Codepoint of the same physical key on the base layout (0 when
    /// unreported)
    pub base_layout_key: u32,
    /// Alternate-layout codepoint from the third section (0 when unreported)
    pub alternate_key: u32,
    pub modifiers: KeyModifiers,
}

/// Enable extended keyboard reporting with the full flag set.
pub fn enable<W: Write>(out: &mut W) -> Result<()> {
    let flags = KeyboardFlags::all().bits();
    write!(out, "{}>{}u", codes::CSI, flags)?;
    out.flush()?;
    Ok(())
}

/// Restore the terminal's previous keyboard-reporting behavior.
pub fn disable<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "{}<u", codes::CSI)?;
    out.flush()?;
    Ok(())
}

/// Trailers that can end a keyboard report. `R` is deliberately absent: it
/// collides with the cursor-position report.
const TRAILERS: &str = "u~ABCDEHFPQS";

/// Legacy letter trailers and the CSI numbers they alias.
fn letter_trailer_to_csi_number(trailer: char) -> Option<u32> {
    match trailer {
        'A' => Some(57352), // up
        'B' => Some(57353), // down
        'C' => Some(57351), // right
        'D' => Some(57350), // left
        'E' => Some(57427), // numpad begin
        'F' => Some(8),     // end
        'H' => Some(7),     // home
        'P' => Some(11),    // F1
        'Q' => Some(12),    // F2
        'S' => Some(14),    // F4
        _ => None,
    }
}

/// Legacy VT numbers to the protocol's private-use functional codepoints.
fn csi_number_to_functional(csi: u32) -> Option<u32> {
    match csi {
        2 => Some(57348),   // insert
        3 => Some(57349),   // delete
        5 => Some(57354),   // page up
        6 => Some(57355),   // page down
        7 => Some(57356),   // home
        8 => Some(57357),   // end
        9 => Some(57346),   // tab
        11 => Some(57364),  // F1
        12 => Some(57365),  // F2
        13 => Some(57345),  // enter
        14 => Some(57367),  // F4
        15 => Some(57368),  // F5
        17 => Some(57369),  // F6
        18 => Some(57370),  // F7
        19 => Some(57371),  // F8
        20 => Some(57372),  // F9
        21 => Some(57373),  // F10
        23 => Some(57374),  // F11
        24 => Some(57375),  // F12
        27 => Some(57344),  // escape
        127 => Some(57347), // backspace
        _ => None,
    }
}

/// Functional-key codepoints (U+E000 private-use block) to platform keys.
fn functional_key_to_code(number: u32) -> KeyCode {
    match number {
        57344 => KeyCode::Escape,
        57345 => KeyCode::Return,
        57346 => KeyCode::Tab,
        57347 => KeyCode::Backspace,
        57348 => KeyCode::Insert,
        57349 => KeyCode::Delete,
        57350 => KeyCode::Left,
        57351 => KeyCode::Right,
        57352 => KeyCode::Up,
        57353 => KeyCode::Down,
        57354 => KeyCode::PageUp,
        57355 => KeyCode::PageDown,
        57356 => KeyCode::Home,
        57357 => KeyCode::End,
        57358 => KeyCode::CapsLock,
        57359 => KeyCode::ScrollLock,
        57360 => KeyCode::NumLock,
        57361 => KeyCode::PrintScreen,
        57362 => KeyCode::Pause,
        57363 => KeyCode::Menu,
        57364 => KeyCode::F1,
        57365 => KeyCode::F2,
        57366 => KeyCode::F3,
        57367 => KeyCode::F4,
        57368 => KeyCode::F5,
        57369 => KeyCode::F6,
        57370 => KeyCode::F7,
        57371 => KeyCode::F8,
        57372 => KeyCode::F9,
        57373 => KeyCode::F10,
        57374 => KeyCode::F11,
        57375 => KeyCode::F12,
        57376 => KeyCode::F13,
        57377 => KeyCode::F14,
        57378 => KeyCode::F15,
        57379 => KeyCode::F16,
        57380 => KeyCode::F17,
        57381 => KeyCode::F18,
        57382 => KeyCode::F19,
        57383 => KeyCode::F20,
        57384 => KeyCode::F21,
        57385 => KeyCode::F22,
        57386 => KeyCode::F23,
        57387 => KeyCode::F24,
        57399 => KeyCode::Numpad0,
        57400 => KeyCode::Numpad1,
        57401 => KeyCode::Numpad2,
        57402 => KeyCode::Numpad3,
        57403 => KeyCode::Numpad4,
        57404 => KeyCode::Numpad5,
        57405 => KeyCode::Numpad6,
        57406 => KeyCode::Numpad7,
        57407 => KeyCode::Numpad8,
        57408 => KeyCode::Numpad9,
        57409 => KeyCode::NumpadDecimal,
        57410 => KeyCode::NumpadDivide,
        57411 => KeyCode::NumpadMultiply,
        57412 => KeyCode::NumpadSubtract,
        57413 => KeyCode::NumpadAdd,
        57414 => KeyCode::Return, // numpad enter
        57416 => KeyCode::NumpadSeparator,
        57417 => KeyCode::Left,
        57418 => KeyCode::Right,
        57419 => KeyCode::Up,
        57420 => KeyCode::Down,
        57421 => KeyCode::PageUp,
        57422 => KeyCode::PageDown,
        57423 => KeyCode::Home,
        57424 => KeyCode::End,
        57425 => KeyCode::Insert,
        57426 => KeyCode::Delete,
        57428 => KeyCode::MediaPlay,
        57429 => KeyCode::MediaPause,
        57430 => KeyCode::MediaPlayPause,
        57432 => KeyCode::MediaStop,
        57435 => KeyCode::MediaNextTrack,
        57436 => KeyCode::MediaPrevTrack,
        57438 => KeyCode::VolumeDown,
        57439 => KeyCode::VolumeUp,
        57440 => KeyCode::VolumeMute,
        57441 => KeyCode::LeftShift,
        57442 => KeyCode::LeftControl,
        57443 => KeyCode::LeftAlt,
        57444..=57446 => KeyCode::LeftSuper,
        57447 => KeyCode::RightShift,
        57448 => KeyCode::RightControl,
        57449 => KeyCode::RightAlt,
        57450..=57452 => KeyCode::RightSuper,
        _ => KeyCode::Unknown,
    }
}

/// Split a `;`-section into its `:`-separated numeric sub-fields. Empty
/// sub-fields take the section's default; a non-numeric sub-field makes the
/// whole section unparseable.
fn sub_sections(section: &str, missing: u32) -> Option<Vec<u32>> {
    section
        .split(':')
        .map(|field| {
            if field.is_empty() {
                Some(missing)
            } else {
                field.parse::<u32>().ok()
            }
        })
        .collect()
}

/// Decode a CSI payload (final byte included) into a key event, or `None`
/// when the payload is not a keyboard report so that the caller can hand it
/// to another decoder.
pub fn key_event_from_csi(csi: &str) -> Option<KeyEvent> {
    if csi.is_empty() || !csi.is_ascii() {
        return None;
    }
    let trailer = *csi.as_bytes().last()? as char;
    let body = &csi[..csi.len() - 1];

    if !TRAILERS.contains(trailer) {
        return None;
    }
    // Bracketed-paste markers belong to a different decoder
    if trailer == '~' && (body == "200" || body == "201") {
        return None;
    }

    // A section that fails to parse rejects the whole report, so replies to
    // other queries sharing the trailer (e.g. the `CSI ? flags u` flags
    // reply) fall through to other consumers.
    let mut sections = body.split(';');
    let first = sub_sections(sections.next().unwrap_or(""), 0)?;
    let second = match sections.next() {
        Some(s) => sub_sections(s, 1)?,
        None => Vec::new(),
    };
    let third = match sections.next() {
        Some(s) => sub_sections(s, 0)?,
        None => Vec::new(),
    };

    let mut keynum = match letter_trailer_to_csi_number(trailer) {
        Some(n) => n,
        None => *first.first()?,
    };

    let mut event = KeyEvent::default();
    if keynum == 13 {
        // Historical ambiguity: CSI 13~ was F3 on some terminals, while the
        // extended protocol reports Enter as 13u.
        event.key_code = Some(if trailer == 'u' {
            KeyCode::Return
        } else {
            KeyCode::F3
        });
    } else if keynum != 0 {
        if let Some(functional) = csi_number_to_functional(keynum) {
            keynum = functional;
        }
        match functional_key_to_code(keynum) {
            // No platform mapping: the number is a literal codepoint
            KeyCode::Unknown => event.key = Some(keynum),
            code => event.key_code = Some(code),
        }
    }

    if let Some(&shifted) = first.get(1) {
        event.shifted_key = shifted;
    }
    if let Some(&base) = first.get(2) {
        event.base_layout_key = base;
    }
    if let Some(&mods) = second.first() {
        event.modifiers = KeyModifiers::from_bits_truncate(mods.saturating_sub(1) as u16);
    }
    if let Some(&kind) = second.get(1) {
        event.kind = KeyEventKind::from_wire(kind);
    }
    if let Some(&alternate) = third.first() {
        event.alternate_key = alternate;
    }

    Some(event)
}

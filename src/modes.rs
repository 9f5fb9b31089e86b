//! Terminal mode manager
//!
//! Owns the terminal session's setup/teardown and the toggling of DEC
//! private modes. Every operation writes fully formed control sequences to a
//! caller-supplied sink and propagates write failures without retrying;
//! callers serialize their own writes.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::codes;
use crate::Result;

/// DEC private modes used by this layer, tagged with their mode numbers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u16)]
pub enum Mode {
    /// DECCKM - cursor keys send application sequences
    CursorKeyToApp = 1,
    /// DECSCNM - reverse video
    ReverseVideo = 5,
    /// DECAWM - auto-wrap
    AutoWrap = 7,
    /// DECARM - auto-repeat
    AutoRepeat = 8,
    /// DECTCEM - text cursor visible
    TextCursor = 25,
    /// Mouse reporting: button press/release only
    MouseButtonTracking = 1000,
    /// Mouse reporting: buttons and drag
    MouseMotionTracking = 1002,
    /// Mouse reporting: all movement
    MouseMoveTracking = 1003,
    /// Focus in/out reporting
    FocusTracking = 1004,
    /// UTF-8 extended mouse coordinates
    MouseUtf8 = 1005,
    /// SGR extended mouse coordinates
    MouseSgr = 1006,
    /// SGR mouse coordinates in pixels
    MouseSgrPixel = 1016,
    /// Alternate screen buffer with cursor save/restore
    AlternateScreen = 1049,
    /// Bracketed paste markers
    BracketedPaste = 2004,
    /// Synchronized update
    SynchronizedUpdate = 2026,
}

impl Mode {
    /// The DEC private-mode number on the wire.
    pub fn number(self) -> u16 {
        self as u16
    }
}

/// Builds and sends terminal mode, cursor, screen, and title sequences, and
/// owns the session setup/cleanup lifecycle.
///
/// Tracks which modes it has switched on so that enabling and then disabling
/// a set of modes provably restores the starting state.
#[derive(Debug, Clone, Default)]
pub struct ModeManager {
    active: BTreeSet<Mode>,
}

impl ModeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if this manager has switched `mode` on and not yet off.
    pub fn is_active(&self, mode: Mode) -> bool {
        self.active.contains(&mode)
    }

    /// Modes currently toggled on by this manager, in mode-number order.
    pub fn active_modes(&self) -> Vec<Mode> {
        self.active.iter().copied().collect()
    }

    /// Set or reset a batch of modes as one buffered write.
    pub fn set_modes<W: Write>(&mut self, out: &mut W, modes: &[Mode], enabled: bool) -> Result<()> {
        let mut buf = String::new();
        self.push_modes(&mut buf, modes, enabled);
        out.write_all(buf.as_bytes())?;
        Ok(())
    }

    fn push_modes(&mut self, buf: &mut String, modes: &[Mode], enabled: bool) {
        for &mode in modes {
            let trailer = if enabled { 'h' } else { 'l' };
            // write! to a String cannot fail
            let _ = write!(buf, "{}?{}{}", codes::CSI, mode.number(), trailer);
            if enabled {
                self.active.insert(mode);
            } else {
                self.active.remove(&mode);
            }
        }
    }

    /// Enter the session: save cursor, private-mode, and color state, switch
    /// the terminal to a known baseline, enter the alternate screen, and
    /// clear it. Emitted as a single buffered write.
    pub fn setup<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut buf = String::new();
        buf.push_str(codes::S7C1T);
        buf.push_str(codes::SAVE_CURSOR);
        buf.push_str(codes::SAVE_PRIVATE_MODE_VALUES);
        buf.push_str(codes::SAVE_COLORS);
        buf.push_str(codes::DECSACE_DEFAULT_REGION_SELECT);
        buf.push_str(codes::RESET_IRM);

        self.push_modes(
            &mut buf,
            &[
                Mode::TextCursor,
                Mode::CursorKeyToApp,
                Mode::ReverseVideo,
                Mode::BracketedPaste,
                Mode::FocusTracking,
                Mode::MouseButtonTracking,
                Mode::MouseMotionTracking,
                Mode::MouseMoveTracking,
                Mode::MouseUtf8,
                Mode::MouseSgr,
            ],
            false,
        );
        self.push_modes(
            &mut buf,
            &[Mode::AutoRepeat, Mode::AutoWrap, Mode::AlternateScreen],
            true,
        );
        buf.push_str(codes::CLEAR_SCREEN);

        out.write_all(buf.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Leave the session: clear the screen, exit the alternate screen, and
    /// restore the state saved by [`setup`](Self::setup).
    pub fn cleanup<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let mut buf = String::new();
        buf.push_str(codes::CLEAR_SCREEN);
        self.push_modes(&mut buf, &[Mode::AlternateScreen], false);
        buf.push_str(codes::RESTORE_PRIVATE_MODE_VALUES);
        buf.push_str(codes::RESTORE_CURSOR);
        buf.push_str(codes::RESTORE_COLORS);

        out.write_all(buf.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Move the cursor to a 1-based position, row first (CUP argument order).
pub fn place_cursor<W: Write>(out: &mut W, row: u32, col: u32) -> Result<()> {
    write!(out, "{}{};{}H", codes::CSI, row, col)?;
    Ok(())
}

/// Clear the whole screen and home the cursor.
pub fn clear_screen<W: Write>(out: &mut W) -> Result<()> {
    out.write_all(codes::CLEAR_SCREEN.as_bytes())?;
    Ok(())
}

/// Set the window title (OSC 2, BEL-terminated).
pub fn set_title<W: Write>(out: &mut W, title: &str) -> Result<()> {
    write!(out, "{}]2;{}\x07", codes::ESC, title)?;
    out.flush()?;
    Ok(())
}

/// Ask the terminal to report its window size in pixels (`CSI 14 t`); the
/// reply arrives on the input stream as a CSI sequence.
pub fn request_window_size<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "{}14t", codes::CSI)?;
    Ok(())
}

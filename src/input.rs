//! Input-event routing
//!
//! Bridges the tokenizer to the keyboard and mouse codecs: each completed
//! CSI payload is offered to the keyboard decoder first, then the mouse
//! decoder; plain codepoints pass straight through. Structurally valid
//! payloads that neither decoder understands are dropped, observable only as
//! the absence of an event.

use serde::{Deserialize, Serialize};

use crate::keys::{key_event_from_csi, KeyEvent};
use crate::mouse::{mouse_event_from_csi, MouseEvent};
use crate::parser::SequenceHandler;

/// A structured event decoded from the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// A codepoint outside any control sequence
    Codepoint(char),
}

/// [`SequenceHandler`] that decodes CSI payloads into [`InputEvent`]s and
/// hands them to a callback.
///
/// The callback's return value is the tokenizer's cooperative early-exit
/// signal: return `false` to stop the current `feed` call.
pub struct EventRouter<F: FnMut(InputEvent) -> bool> {
    on_event: F,
}

impl<F: FnMut(InputEvent) -> bool> EventRouter<F> {
    pub fn new(on_event: F) -> Self {
        Self { on_event }
    }
}

impl<F: FnMut(InputEvent) -> bool> SequenceHandler for EventRouter<F> {
    fn codepoint(&mut self, ch: char) -> bool {
        (self.on_event)(InputEvent::Codepoint(ch))
    }

    fn csi(&mut self, payload: &[u8]) -> bool {
        let Ok(text) = std::str::from_utf8(payload) else {
            log::debug!("dropping non-UTF-8 CSI payload: {payload:?}");
            return true;
        };
        if let Some(key) = key_event_from_csi(text) {
            return (self.on_event)(InputEvent::Key(key));
        }
        if let Some(mouse) = mouse_event_from_csi(text) {
            return (self.on_event)(InputEvent::Mouse(mouse));
        }
        log::debug!("unrecognized CSI payload: {text:?}");
        true
    }
}

//! Termwire - terminal control-protocol layer
//!
//! Parses incoming escape/control sequences from a raw input stream and
//! encodes the outgoing sequences that drive terminal graphics, keyboard,
//! and mouse extensions:
//!
//! - `parser`: resumable escape/control-sequence tokenizer (7-bit and 8-bit
//!   introducers, CSI grammar, string payloads)
//! - `keys`: kitty extended keyboard protocol decoder and mode toggles
//! - `mouse`: SGR pixel-mode mouse protocol decoder and mode toggles
//! - `graphics`: kitty graphics/animation encoder over shared-memory names
//! - `modes`: DEC private-mode manager and session setup/cleanup
//! - `input`: routing from tokenized CSI payloads to structured events
//!
//! The crate performs no reads, owns no file descriptors, and applies no
//! backpressure: callers feed input chunks in and pass an output sink for
//! every write.

pub mod graphics;
pub mod input;
pub mod keycode;
pub mod keys;
pub mod modes;
pub mod mouse;
pub mod parser;

mod codes;
mod error;
mod utf8;

pub use error::{Error, Result};
pub use graphics::{GraphicsEncoder, ImageId, Point, Size};
pub use input::{EventRouter, InputEvent};
pub use keycode::KeyCode;
pub use keys::{KeyEvent, KeyEventKind, KeyModifiers, KeyboardFlags};
pub use modes::{Mode, ModeManager};
pub use mouse::{MouseButtons, MouseEvent, MouseEventKind, MouseModifiers};
pub use parser::{EscapeParser, ParserState, SequenceHandler, SequenceKind};

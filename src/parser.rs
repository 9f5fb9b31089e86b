//! Control-sequence tokenizer
//!
//! A resumable state machine that segments a raw byte stream into classified
//! control sequences. Both encodings of every introducer are understood: the
//! 7-bit ESC-prefixed forms and the single-byte C1 codepoints (which arrive
//! through the UTF-8 decoder as U+0090..U+009F). String payloads terminate on
//! ST (ESC `\` or the UTF-8 encoding of C1 ST, 0xC2 0x9C) and, for OSC only,
//! on a bare BEL.
//!
//! The parser never performs I/O and is valid and resumable after any input,
//! however malformed.

use crate::utf8::{Utf8Decoder, Utf8Result};

/// Maximum accumulated length for string payloads; excess bytes are dropped.
const MAX_STRING_LEN: usize = 65536;

/// Sequence categories dispatched to a [`SequenceHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Csi,
    Osc,
    Dcs,
    Pm,
    Sos,
    Apc,
}

/// Tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Plain codepoint passthrough
    #[default]
    Normal,
    /// After a 7-bit ESC, waiting for the category selector
    Escape,
    /// Accumulating a CSI parameter/intermediate/final byte stream
    Csi,
    /// Accumulating a string payload (OSC/DCS/PM/SOS/APC)
    StringPayload,
    /// Saw ESC inside a string payload; `\` completes the sequence
    StringPayloadEsc,
    /// Saw 0xC2 inside a string payload; 0x9C completes the sequence
    StringPayloadC1,
}

/// CSI byte-stream phase. Once an intermediate byte has been seen, a
/// parameter byte is a protocol violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CsiPhase {
    #[default]
    Parameter,
    Intermediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsiByte {
    Parameter,
    Intermediate,
    Final,
    Invalid,
}

fn csi_byte_type(byte: u8) -> CsiByte {
    match byte {
        0x30..=0x3F | b'-' => CsiByte::Parameter,
        0x40..=0x7E => CsiByte::Final,
        0x20..=0x2F => CsiByte::Intermediate,
        _ => CsiByte::Invalid,
    }
}

/// Receiver for completed sequences and plain codepoints.
///
/// One method per sequence category; the payload excludes the introducer and
/// terminator (CSI payloads include the final byte). Every method defaults to
/// returning `true`. Returning `false` is the cooperative early-exit signal:
/// the tokenizer stops processing the remainder of the current chunk and
/// [`EscapeParser::feed`] returns `false`. It is a control signal, not an
/// error.
pub trait SequenceHandler {
    /// A codepoint outside any control sequence.
    fn codepoint(&mut self, ch: char) -> bool {
        let _ = ch;
        true
    }

    /// A completed CSI sequence, final byte included.
    fn csi(&mut self, payload: &[u8]) -> bool {
        let _ = payload;
        true
    }

    /// A completed OSC string.
    fn osc(&mut self, payload: &[u8]) -> bool {
        let _ = payload;
        true
    }

    /// A completed DCS string.
    fn dcs(&mut self, payload: &[u8]) -> bool {
        let _ = payload;
        true
    }

    /// A completed PM string.
    fn pm(&mut self, payload: &[u8]) -> bool {
        let _ = payload;
        true
    }

    /// A completed SOS string.
    fn sos(&mut self, payload: &[u8]) -> bool {
        let _ = payload;
        true
    }

    /// A completed APC string.
    fn apc(&mut self, payload: &[u8]) -> bool {
        let _ = payload;
        true
    }
}

/// The escape/control-sequence tokenizer.
///
/// Owns exactly one input stream's accumulation state; instantiate one parser
/// per input source.
#[derive(Debug, Clone, Default)]
pub struct EscapeParser {
    state: ParserState,
    utf8: Utf8Decoder,
    buffer: Vec<u8>,
    kind: Option<SequenceKind>,
    csi_phase: CsiPhase,
}

impl EscapeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tokenizer state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Clear all accumulation state unconditionally.
    ///
    /// Returns `false`, the not-continuing signal, so that handlers can
    /// abort with `return parser.reset()`.
    pub fn reset(&mut self) -> bool {
        self.buffer.clear();
        self.state = ParserState::Normal;
        self.utf8.reset();
        self.kind = None;
        self.csi_phase = CsiPhase::Parameter;
        false
    }

    /// Process a chunk of input in arrival order.
    ///
    /// Returns `true` if the whole chunk was consumed; returns `false` and
    /// stops at the first handler method that itself returns `false`.
    /// Sequences split across chunks resume where they left off.
    pub fn feed<H: SequenceHandler>(&mut self, input: &[u8], handler: &mut H) -> bool {
        for &byte in input {
            if !self.advance(byte, handler) {
                return false;
            }
        }
        true
    }

    fn advance<H: SequenceHandler>(&mut self, byte: u8, handler: &mut H) -> bool {
        match self.state {
            ParserState::Normal => {
                let was_pending = self.utf8.is_pending();
                match self.utf8.feed(byte) {
                    Utf8Result::Char(c) => self.codepoint(c, handler),
                    Utf8Result::Invalid => {
                        // A byte that broke off a multi-byte sequence may
                        // itself start a fresh one.
                        if was_pending {
                            self.advance(byte, handler)
                        } else {
                            true
                        }
                    }
                    Utf8Result::Pending => true,
                }
            }
            ParserState::Escape => self.escape_byte(byte, handler),
            ParserState::Csi => self.csi_byte(byte, handler),
            ParserState::StringPayload => self.string_byte(byte, handler),
            ParserState::StringPayloadEsc => {
                if byte == b'\\' {
                    return self.dispatch(handler);
                }
                // Lone ESC: push it back into the payload verbatim and
                // reprocess the byte it did not terminate with.
                self.push_payload(0x1B);
                self.state = ParserState::StringPayload;
                self.string_byte(byte, handler)
            }
            ParserState::StringPayloadC1 => {
                if byte == 0x9C {
                    return self.dispatch(handler);
                }
                // Lone C1 lead byte: same pushback treatment as ESC.
                self.push_payload(0xC2);
                self.state = ParserState::StringPayload;
                self.string_byte(byte, handler)
            }
        }
    }

    fn codepoint<H: SequenceHandler>(&mut self, ch: char, handler: &mut H) -> bool {
        match ch {
            '\x1b' => self.state = ParserState::Escape,
            '\u{90}' => self.begin_string(SequenceKind::Dcs),
            '\u{9b}' => self.begin_csi(),
            '\u{9d}' => self.begin_string(SequenceKind::Osc),
            '\u{98}' => self.begin_string(SequenceKind::Sos),
            '\u{9e}' => self.begin_string(SequenceKind::Pm),
            '\u{9f}' => self.begin_string(SequenceKind::Apc),
            _ => {
                if !handler.codepoint(ch) {
                    return self.reset();
                }
            }
        }
        true
    }

    fn escape_byte<H: SequenceHandler>(&mut self, byte: u8, handler: &mut H) -> bool {
        match byte {
            b'P' => self.begin_string(SequenceKind::Dcs),
            b'[' => self.begin_csi(),
            b']' => self.begin_string(SequenceKind::Osc),
            b'^' => self.begin_string(SequenceKind::Pm),
            b'_' => self.begin_string(SequenceKind::Apc),
            _ => {
                // Dangling ESC: drop it and reprocess as Normal-state input.
                self.reset();
                return self.advance(byte, handler);
            }
        }
        true
    }

    fn csi_byte<H: SequenceHandler>(&mut self, byte: u8, handler: &mut H) -> bool {
        self.buffer.push(byte);
        let ty = csi_byte_type(byte);
        match self.csi_phase {
            CsiPhase::Parameter => match ty {
                CsiByte::Parameter => {}
                CsiByte::Intermediate => self.csi_phase = CsiPhase::Intermediate,
                CsiByte::Final => return self.dispatch(handler),
                CsiByte::Invalid => self.abort_csi(byte),
            },
            CsiPhase::Intermediate => match ty {
                CsiByte::Intermediate => {}
                CsiByte::Final => return self.dispatch(handler),
                // A parameter byte may never follow an intermediate byte.
                CsiByte::Parameter | CsiByte::Invalid => self.abort_csi(byte),
            },
        }
        true
    }

    fn string_byte<H: SequenceHandler>(&mut self, byte: u8, handler: &mut H) -> bool {
        match byte {
            0x07 if self.kind == Some(SequenceKind::Osc) => self.dispatch(handler),
            0x1B => {
                self.state = ParserState::StringPayloadEsc;
                true
            }
            0xC2 => {
                self.state = ParserState::StringPayloadC1;
                true
            }
            _ => {
                self.push_payload(byte);
                true
            }
        }
    }

    fn begin_csi(&mut self) {
        self.state = ParserState::Csi;
        self.kind = Some(SequenceKind::Csi);
        self.csi_phase = CsiPhase::Parameter;
    }

    fn begin_string(&mut self, kind: SequenceKind) {
        self.state = ParserState::StringPayload;
        self.kind = Some(kind);
    }

    fn push_payload(&mut self, byte: u8) {
        if self.buffer.len() < MAX_STRING_LEN {
            self.buffer.push(byte);
        }
    }

    fn abort_csi(&mut self, byte: u8) {
        log::debug!("aborting CSI sequence on byte {byte:#04x}");
        self.reset();
    }

    fn dispatch<H: SequenceHandler>(&mut self, handler: &mut H) -> bool {
        let buffer = std::mem::take(&mut self.buffer);
        let result = match self.kind {
            Some(SequenceKind::Csi) => handler.csi(&buffer),
            Some(SequenceKind::Osc) => handler.osc(&buffer),
            Some(SequenceKind::Dcs) => handler.dcs(&buffer),
            Some(SequenceKind::Pm) => handler.pm(&buffer),
            Some(SequenceKind::Sos) => handler.sos(&buffer),
            Some(SequenceKind::Apc) => handler.apc(&buffer),
            None => true,
        };
        self.reset();
        result
    }
}

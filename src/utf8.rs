//! Streaming UTF-8 decoder
//!
//! The tokenizer decodes Normal-state input one codepoint at a time so that
//! C1 controls transported as two-byte UTF-8 sequences are recognized the
//! same way as their 7-bit ESC-prefixed forms.

/// Incremental UTF-8 decoder, one byte per call.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    /// Codepoint bits accumulated so far
    codepoint: u32,
    /// Continuation bytes still expected
    remaining: usize,
    /// Total length of the sequence in progress (for overlong checks)
    len: usize,
}

/// Result of feeding a byte to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Result {
    /// Need more bytes
    Pending,
    /// Successfully decoded a codepoint
    Char(char),
    /// Invalid sequence; the decoder has been reset
    Invalid,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset mid-sequence state.
    pub fn reset(&mut self) {
        self.codepoint = 0;
        self.remaining = 0;
        self.len = 0;
    }

    /// True while a multi-byte sequence is in progress.
    pub fn is_pending(&self) -> bool {
        self.remaining > 0
    }

    /// Feed a byte to the decoder.
    ///
    /// On `Invalid` the decoder is already reset; if the invalid byte ended a
    /// sequence early it may itself be the start of a fresh sequence and can
    /// be fed again.
    pub fn feed(&mut self, byte: u8) -> Utf8Result {
        if self.remaining == 0 {
            return self.start(byte);
        }

        if byte & 0b1100_0000 != 0b1000_0000 {
            // Not a continuation byte
            self.reset();
            return Utf8Result::Invalid;
        }

        self.codepoint = (self.codepoint << 6) | u32::from(byte & 0x3F);
        self.remaining -= 1;
        if self.remaining > 0 {
            return Utf8Result::Pending;
        }

        let cp = self.codepoint;
        let len = self.len;
        self.reset();

        let overlong = match len {
            2 => cp < 0x80,
            3 => cp < 0x800,
            _ => cp < 0x1_0000,
        };
        if overlong {
            return Utf8Result::Invalid;
        }
        match char::from_u32(cp) {
            Some(c) => Utf8Result::Char(c),
            // Surrogates and out-of-range values
            None => Utf8Result::Invalid,
        }
    }

    fn start(&mut self, byte: u8) -> Utf8Result {
        if byte < 0x80 {
            return Utf8Result::Char(byte as char);
        }
        let (bits, total) = match byte {
            b if b & 0b1110_0000 == 0b1100_0000 => (u32::from(b & 0x1F), 2),
            b if b & 0b1111_0000 == 0b1110_0000 => (u32::from(b & 0x0F), 3),
            b if b & 0b1111_1000 == 0b1111_0000 => (u32::from(b & 0x07), 4),
            // Bare continuation byte or invalid lead
            _ => return Utf8Result::Invalid,
        };
        self.codepoint = bits;
        self.remaining = total - 1;
        self.len = total;
        Utf8Result::Pending
    }
}

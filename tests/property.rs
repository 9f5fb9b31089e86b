//! Property-based tests for the tokenizer and the CSI decoders
//!
//! Randomized inputs exercise the invariants that no unit test can pin down
//! exhaustively: the tokenizer accepts arbitrary bytes without panicking, and
//! its dispatch stream does not depend on how the input is chunked.

use proptest::prelude::*;

use termwire::{EscapeParser, SequenceHandler, SequenceKind};

/// Records every dispatch so two runs can be compared.
#[derive(Default, Debug, PartialEq)]
struct Recorder {
    codepoints: Vec<char>,
    sequences: Vec<(SequenceKind, Vec<u8>)>,
}

impl SequenceHandler for Recorder {
    fn codepoint(&mut self, ch: char) -> bool {
        self.codepoints.push(ch);
        true
    }
    fn csi(&mut self, payload: &[u8]) -> bool {
        self.sequences.push((SequenceKind::Csi, payload.to_vec()));
        true
    }
    fn osc(&mut self, payload: &[u8]) -> bool {
        self.sequences.push((SequenceKind::Osc, payload.to_vec()));
        true
    }
    fn dcs(&mut self, payload: &[u8]) -> bool {
        self.sequences.push((SequenceKind::Dcs, payload.to_vec()));
        true
    }
    fn pm(&mut self, payload: &[u8]) -> bool {
        self.sequences.push((SequenceKind::Pm, payload.to_vec()));
        true
    }
    fn sos(&mut self, payload: &[u8]) -> bool {
        self.sequences.push((SequenceKind::Sos, payload.to_vec()));
        true
    }
    fn apc(&mut self, payload: &[u8]) -> bool {
        self.sequences.push((SequenceKind::Apc, payload.to_vec()));
        true
    }
}

fn feed_whole(input: &[u8]) -> Recorder {
    let mut parser = EscapeParser::new();
    let mut rec = Recorder::default();
    parser.feed(input, &mut rec);
    rec
}

fn feed_chunked(input: &[u8], chunk_len: usize) -> Recorder {
    let mut parser = EscapeParser::new();
    let mut rec = Recorder::default();
    for chunk in input.chunks(chunk_len.max(1)) {
        parser.feed(chunk, &mut rec);
    }
    rec
}

/// A mix of well-formed sequences and raw noise, so random concatenations
/// cover both the happy paths and the recovery paths.
fn stream_fragment() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        // Arbitrary bytes, including invalid UTF-8 and stray controls
        proptest::collection::vec(any::<u8>(), 0..16),
        // Well-formed CSI
        "[0-9;:<>]{0,8}[a-zA-Z~]".prop_map(|s| {
            let mut v = b"\x1b[".to_vec();
            v.extend_from_slice(s.as_bytes());
            v
        }),
        // Well-formed OSC with each terminator
        ("[ -~]{0,12}", 0..3usize).prop_map(|(s, t)| {
            let mut v = b"\x1b]".to_vec();
            v.extend_from_slice(s.as_bytes());
            v.extend_from_slice(match t {
                0 => b"\x07".as_slice(),
                1 => b"\x1b\\".as_slice(),
                _ => b"\xc2\x9c".as_slice(),
            });
            v
        }),
        // Plain UTF-8 text
        "\\PC{0,8}".prop_map(String::into_bytes),
    ]
}

fn stream() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(stream_fragment(), 0..8).prop_map(|frags| frags.concat())
}

proptest! {
    /// Feeding any byte stream never panics and leaves the parser resumable.
    #[test]
    fn tokenizer_accepts_arbitrary_bytes(input in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut parser = EscapeParser::new();
        let mut rec = Recorder::default();
        parser.feed(&input, &mut rec);
        // Terminate any string payload the noise may have opened, then check
        // the parser is still usable.
        parser.feed(b"\x1b\\", &mut rec);
        prop_assert!(parser.feed(b"\x1b[0m", &mut rec));
        let (kind, payload) = rec.sequences.last().expect("trailing CSI dispatch");
        prop_assert_eq!(*kind, SequenceKind::Csi);
        prop_assert!(payload.ends_with(b"m"));
    }

    /// Dispatches are identical no matter how the stream is split into
    /// chunks.
    #[test]
    fn chunking_does_not_change_dispatches(input in stream(), chunk_len in 1usize..32) {
        let whole = feed_whole(&input);
        let chunked = feed_chunked(&input, chunk_len);
        prop_assert_eq!(whole, chunked);
    }

    /// Byte-at-a-time feeding matches whole-buffer feeding even for raw
    /// noise.
    #[test]
    fn byte_at_a_time_matches_whole(input in proptest::collection::vec(any::<u8>(), 0..128)) {
        let whole = feed_whole(&input);
        let chunked = feed_chunked(&input, 1);
        prop_assert_eq!(whole, chunked);
    }

    /// The keyboard decoder never panics and never claims a mouse report.
    #[test]
    fn key_decoder_total(payload in "[ -~]{0,24}") {
        let key = termwire::keys::key_event_from_csi(&payload);
        let mouse = termwire::mouse::mouse_event_from_csi(&payload);
        prop_assert!(key.is_none() || mouse.is_none());
    }

    /// Any descriptor/coordinate combination decodes without panicking, and
    /// coordinates survive unchanged.
    #[test]
    fn mouse_decoder_total(descriptor in 0u16..2048, x in 0i32..100_000, y in 0i32..100_000, release in any::<bool>()) {
        let trailer = if release { 'm' } else { 'M' };
        let payload = format!("<{descriptor};{x};{y}{trailer}");
        let event = termwire::mouse::mouse_event_from_csi(&payload).expect("well-formed report");
        prop_assert_eq!((event.x, event.y), (x, y));
    }
}

//! End-to-end tests wiring the tokenizer to the event router
//!
//! These feed realistic mixed byte streams (text, keyboard reports, mouse
//! reports, string sequences) through `EscapeParser` + `EventRouter` and
//! check the decoded event sequence, including across chunk boundaries.

use termwire::keycode::KeyCode;
use termwire::keys::KeyModifiers;
use termwire::mouse::{MouseButtons, MouseEventKind};
use termwire::{EscapeParser, EventRouter, InputEvent, KeyEventKind};

fn collect_chunked(chunks: &[&[u8]]) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut router = EventRouter::new(|ev| {
        events.push(ev);
        true
    });
    let mut parser = EscapeParser::new();
    for chunk in chunks {
        assert!(parser.feed(chunk, &mut router));
    }
    drop(router);
    events
}

fn collect(input: &[u8]) -> Vec<InputEvent> {
    collect_chunked(&[input])
}

#[test]
fn test_mixed_session_stream() {
    // Typed text, an extended key report, a mouse drag, more text.
    let events = collect(b"hi\x1b[97;5u\x1b[<32;100;200M!");

    assert_eq!(events.len(), 5);
    assert_eq!(events[0], InputEvent::Codepoint('h'));
    assert_eq!(events[1], InputEvent::Codepoint('i'));

    let InputEvent::Key(key) = events[2] else {
        panic!("expected key event, got {:?}", events[2]);
    };
    assert_eq!(key.key, Some('a' as u32));
    assert_eq!(key.modifiers, KeyModifiers::CTRL);
    assert_eq!(key.kind, KeyEventKind::Down);

    let InputEvent::Mouse(mouse) = events[3] else {
        panic!("expected mouse event, got {:?}", events[3]);
    };
    assert_eq!(mouse.kind, MouseEventKind::Move);
    assert_eq!(mouse.buttons, MouseButtons::LEFT);
    assert_eq!((mouse.x, mouse.y), (100, 200));

    assert_eq!(events[4], InputEvent::Codepoint('!'));
}

#[test]
fn test_chunk_boundaries_inside_sequences() {
    let whole = collect(b"\x1b[13u\x1b[<0;10;20M\x1b[<0;10;20m");

    // Split in the middle of the introducer, the parameters, and the trailer.
    let chunked = collect_chunked(&[
        b"\x1b",
        b"[13",
        b"u\x1b[<0;1",
        b"0;20",
        b"M\x1b[<0;10;20m",
    ]);
    assert_eq!(whole, chunked);
    assert_eq!(whole.len(), 3);

    let InputEvent::Key(key) = whole[0] else {
        panic!("expected key event");
    };
    assert_eq!(key.key_code, Some(KeyCode::Return));
}

#[test]
fn test_string_sequences_do_not_produce_events() {
    // OSC title reply and an APC graphics acknowledgement interleaved with
    // key reports must be consumed silently.
    let events = collect(b"\x1b[13u\x1b]2;some title\x07\x1b_Gi=1;OK\x1b\\\x1b[27u");
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], InputEvent::Key(_)));
    let InputEvent::Key(esc) = events[1] else {
        panic!("expected key event");
    };
    assert_eq!(esc.key_code, Some(KeyCode::Escape));
}

#[test]
fn test_utf8_text_between_reports() {
    let events = collect("é\u{1F600}\x1b[<64;1;1M".as_bytes());
    assert_eq!(events.len(), 3);
    assert_eq!(events[0], InputEvent::Codepoint('é'));
    assert_eq!(events[1], InputEvent::Codepoint('\u{1F600}'));
    let InputEvent::Mouse(wheel) = events[2] else {
        panic!("expected mouse event");
    };
    assert_eq!(wheel.buttons, MouseButtons::WHEEL_UP);
}

#[test]
fn test_cursor_position_report_is_not_a_key() {
    // CPR shares its trailer letter with a legacy key form and must fall
    // through both decoders.
    let events = collect(b"\x1b[12;40Rx");
    assert_eq!(events, vec![InputEvent::Codepoint('x')]);
}

#[test]
fn test_aborted_csi_recovers() {
    // Parameter byte after an intermediate byte aborts the sequence; the
    // stream keeps decoding afterwards.
    let events = collect(b"\x1b[1 2\x1b[13u");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], InputEvent::Key(_)));
}

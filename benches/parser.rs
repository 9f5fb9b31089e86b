//! Tokenizer benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use termwire::{EscapeParser, SequenceHandler};

/// Counts dispatches so the optimizer cannot drop the work.
#[derive(Default)]
struct Counter {
    codepoints: usize,
    sequences: usize,
}

impl SequenceHandler for Counter {
    fn codepoint(&mut self, _ch: char) -> bool {
        self.codepoints += 1;
        true
    }
    fn csi(&mut self, _payload: &[u8]) -> bool {
        self.sequences += 1;
        true
    }
    fn osc(&mut self, _payload: &[u8]) -> bool {
        self.sequences += 1;
        true
    }
    fn apc(&mut self, _payload: &[u8]) -> bool {
        self.sequences += 1;
        true
    }
}

fn bench_input(c: &mut Criterion, name: &str, input: &[u8]) {
    let mut group = c.benchmark_group("tokenizer");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function(name, |b| {
        b.iter(|| {
            let mut parser = EscapeParser::new();
            let mut counter = Counter::default();
            parser.feed(black_box(input), &mut counter);
            black_box((counter.codepoints, counter.sequences))
        })
    });
    group.finish();
}

fn bench_plain_text(c: &mut Criterion) {
    let input = "The quick brown fox jumps over the lazy dog. ".repeat(500);
    bench_input(c, "plain_text", input.as_bytes());
}

fn bench_utf8_text(c: &mut Criterion) {
    let input = "héllo wörld 中文テキスト ".repeat(500);
    bench_input(c, "utf8_text", input.as_bytes());
}

fn bench_key_reports(c: &mut Criterion) {
    let input = "\x1b[97;5u\x1b[13u\x1b[57441;1:3u".repeat(500);
    bench_input(c, "key_reports", input.as_bytes());
}

fn bench_mouse_reports(c: &mut Criterion) {
    let input = "\x1b[<35;474;141M\x1b[<0;10;20M\x1b[<0;10;20m".repeat(500);
    bench_input(c, "mouse_reports", input.as_bytes());
}

fn bench_string_payloads(c: &mut Criterion) {
    let input = "\x1b]2;window title\x07\x1b_Gf=32,t=s,s=64,v=64,a=T,C=1;QUJD\x1b\\".repeat(200);
    bench_input(c, "string_payloads", input.as_bytes());
}

criterion_group!(
    benches,
    bench_plain_text,
    bench_utf8_text,
    bench_key_reports,
    bench_mouse_reports,
    bench_string_payloads
);
criterion_main!(benches);

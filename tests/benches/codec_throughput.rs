//! Codec throughput on paragraph-sized input.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use morse_core::sequencer::{layout, plan};
use morse_core::{decode, encode, SymbolTable, TimingProfile};

fn paragraph(words: usize) -> String {
    const WORDS: [&str; 8] = ["CQ", "DE", "JA1ABC", "SOS", "QTH", "TOKYO", "RST", "599"];
    (0..words)
        .map(|i| WORDS[i % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_codec(c: &mut Criterion) {
    let table = SymbolTable::new();
    let text = paragraph(200);
    let morse = encode(&table, &text);

    c.bench_function("encode_200_words", |b| {
        b.iter(|| encode(&table, black_box(&text)))
    });
    c.bench_function("decode_200_words", |b| {
        b.iter(|| decode(&table, black_box(morse.as_str())))
    });
}

fn bench_sequencer_plan(c: &mut Criterion) {
    let table = SymbolTable::new();
    let morse = encode(&table, &paragraph(200));
    let timing = TimingProfile::default();

    c.bench_function("plan_and_layout_200_words", |b| {
        b.iter(|| {
            let steps = plan(black_box(morse.as_str()), &timing, '/');
            let rects = layout(black_box(morse.as_str()), '/');
            (steps.len(), rects.len())
        })
    });
}

criterion_group!(benches, bench_codec, bench_sequencer_plan);
criterion_main!(benches);

//! Benchmarks for sine tone generation.

use std::hint::black_box;

use chordboard::dsp::generate_tone;
use criterion::{BenchmarkId, Criterion};

use crate::SAMPLE_RATES;

pub fn bench_tone(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tone");

    for &rate in SAMPLE_RATES {
        // Middle C, one standard note length
        group.bench_with_input(BenchmarkId::new("note", rate), &rate, |b, &rate| {
            b.iter(|| generate_tone(black_box(261.63), black_box(0.5), black_box(rate)))
        });

        // Top of the keyboard: B6
        group.bench_with_input(BenchmarkId::new("high_note", rate), &rate, |b, &rate| {
            b.iter(|| generate_tone(black_box(493.88 * 4.0), black_box(0.5), black_box(rate)))
        });
    }

    group.finish();
}

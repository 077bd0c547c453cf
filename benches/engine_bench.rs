//! Benchmarks for tone synthesis and note dispatch.
//!
//! Run with: cargo bench
//!
//! Synthesis runs inline on the thread that delivers a button event, so it
//! has to stay far below the time a player notices. For reference, one note
//! lasts 500ms and a chord 1.5s.
//!
//! Benchmark groups:
//!   - dsp/*        Tone generation at the sample rates a board might use
//!   - scenarios/*  Full dispatch of single notes and chords

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Sample rates worth comparing.
pub const SAMPLE_RATES: &[u32] = &[22_050, 44_100, 48_000];

criterion_group!(
    benches,
    // Synthesis
    dsp::bench_tone,
    // Dispatch
    scenarios::bench_dispatch,
);
criterion_main!(benches);

//! Benchmarks for low-level synthesis.

mod tone;

pub use tone::bench_tone;

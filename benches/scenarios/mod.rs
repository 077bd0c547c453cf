//! Scenario benchmarks: what one button press costs end to end.

mod dispatch;

pub use dispatch::bench_dispatch;

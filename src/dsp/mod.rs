//! Low-level synthesis primitives.
//!
//! Everything here is a pure function of its inputs: the same request always
//! produces the same samples, so buffers can be compared bit for bit.

/// Sine tone synthesis into 16-bit PCM buffers.
pub mod tone;

pub use tone::{generate_tone, WaveformBuffer};

pub mod dsp; // Tone synthesis
pub mod error;
pub mod io; // Audio output and button controls
pub mod synth; // Instrument state, playback, dispatch
pub mod theory; // Notes, octaves and chords

use std::time::Duration;

pub use error::EngineError;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 22_050;
/// Channel count the output device is opened with.
pub const OUTPUT_CHANNELS: u16 = 2;
/// Nominal length of every synthesized note.
pub const NOTE_DURATION: Duration = Duration::from_millis(500);
/// Frequency used for note names that have no table entry (concert A).
pub const DEFAULT_FREQUENCY: f64 = 440.0;
/// Octave at which the note table's reference frequencies sound.
pub const REFERENCE_OCTAVE: u8 = 4;

// Purpose - external interfaces: audio output and the physical button controls

pub mod buttons;
#[cfg(feature = "rtrb")]
pub mod device;

use std::fmt;

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::dsp::WaveformBuffer;

/// Anything that can take a finished tone and start playing it.
///
/// Submission is fire-and-forget: implementations return as soon as the
/// buffer is queued and play it in the background.
pub trait AudioOutput: Send {
    fn submit(&mut self, buffer: WaveformBuffer) -> Result<(), OutputError>;
}

/// Records every submitted buffer, in order
impl AudioOutput for Vec<WaveformBuffer> {
    fn submit(&mut self, buffer: WaveformBuffer) -> Result<(), OutputError> {
        self.push(buffer);
        Ok(())
    }
}

/// Hands buffers to whoever holds the matching consumer (usually an audio callback)
#[cfg(feature = "rtrb")]
impl AudioOutput for Producer<WaveformBuffer> {
    fn submit(&mut self, buffer: WaveformBuffer) -> Result<(), OutputError> {
        if self.is_abandoned() {
            return Err(OutputError::Disconnected);
        }
        self.push(buffer).map_err(|_| OutputError::Busy)
    }
}

/// Failures of the audio output collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// The output queue is full
    Busy,
    /// The playback side has gone away
    Disconnected,
    /// No output device is available
    NoDevice,
    /// The device cannot play the requested format
    UnsupportedConfig {
        sample_rate: u32,
        channels: u16,
    },
    /// A buffer was rendered at a rate the stream is not running at
    SampleRateMismatch {
        expected: u32,
        actual: u32,
    },
    /// The device or its stream reported an error
    Device(String),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Busy => write!(f, "output queue is full"),
            OutputError::Disconnected => write!(f, "audio stream is no longer running"),
            OutputError::NoDevice => write!(f, "no default output device available"),
            OutputError::UnsupportedConfig {
                sample_rate,
                channels,
            } => write!(
                f,
                "output device does not support {} Hz with {} channels",
                sample_rate, channels
            ),
            OutputError::SampleRateMismatch { expected, actual } => write!(
                f,
                "buffer rendered at {} Hz, output runs at {} Hz",
                actual, expected
            ),
            OutputError::Device(message) => write!(f, "audio device error: {}", message),
        }
    }
}

impl std::error::Error for OutputError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::generate_tone;

    fn tone() -> WaveformBuffer {
        generate_tone(440.0, 0.01, 22_050).unwrap()
    }

    #[test]
    fn vec_records_in_order() {
        let mut out: Vec<WaveformBuffer> = Vec::new();
        out.submit(tone()).unwrap();
        out.submit(generate_tone(220.0, 0.01, 22_050).unwrap()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].frequency(), 220.0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn full_ring_reports_busy() {
        let (mut tx, mut rx) = rtrb::RingBuffer::<WaveformBuffer>::new(1);
        tx.submit(tone()).unwrap();
        assert_eq!(tx.submit(tone()), Err(OutputError::Busy));
        assert!(rx.pop().is_ok());
        assert!(tx.submit(tone()).is_ok());
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn dropped_consumer_reports_disconnected() {
        let (mut tx, rx) = rtrb::RingBuffer::<WaveformBuffer>::new(4);
        drop(rx);
        assert_eq!(tx.submit(tone()), Err(OutputError::Disconnected));
    }
}

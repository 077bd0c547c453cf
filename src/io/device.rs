//! Audio output on the default cpal device.
//!
//! The stream plays one tone at a time: a newly submitted buffer replaces
//! whatever is still sounding, and silence fills the gaps. Mono samples are
//! copied to every device channel and converted to the device sample type.
//!
//! Buffers are never freed on the audio thread: the callback hands finished
//! and replaced tones back through a second ring, and `submit` drops them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig};
use rtrb::{Consumer, Producer, RingBuffer};

use super::{AudioOutput, OutputError};
use crate::dsp::WaveformBuffer;

/// Buffers waiting for the audio callback. Tones arrive at most every few
/// hundred milliseconds, so a handful is plenty.
const QUEUE_CAPACITY: usize = 8;
/// Played tones waiting to be freed. Larger than the queue so the callback
/// always has room to return everything it can hold.
const SPENT_CAPACITY: usize = QUEUE_CAPACITY * 2 + 1;

/// How often the stream thread checks for shutdown
const PARK_INTERVAL: Duration = Duration::from_millis(100);

pub struct CpalOutput {
    producer: Producer<WaveformBuffer>,
    spent: Consumer<WaveformBuffer>,
    sample_rate: u32,
    channels: u16,
    shutdown: Arc<AtomicBool>,
    stream_thread: Option<JoinHandle<()>>,
}

impl CpalOutput {
    /// Open the default output device at `sample_rate` with `channels` channels.
    ///
    /// Prefers a 16-bit signed stream; other sample formats are converted.
    pub fn open(sample_rate: u32, channels: u16) -> Result<Self, OutputError> {
        let (producer, consumer) = RingBuffer::new(QUEUE_CAPACITY);
        let (spent_tx, spent) = RingBuffer::new(SPENT_CAPACITY);
        let shutdown = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();

        // cpal streams are not Send, so the stream is built on and owned by
        // its own thread for the lifetime of the output.
        let stream_thread = thread::Builder::new()
            .name("chordboard-audio".into())
            .spawn({
                let shutdown = Arc::clone(&shutdown);
                move || {
                    let playhead = Playhead::new(consumer, spent_tx);
                    let stream = match build_stream(sample_rate, channels, playhead) {
                        Ok(stream) => stream,
                        Err(err) => {
                            let _ = ready_tx.send(Err(err));
                            return;
                        }
                    };
                    let _ = ready_tx.send(Ok(()));
                    while !shutdown.load(Ordering::Acquire) {
                        thread::park_timeout(PARK_INTERVAL);
                    }
                    drop(stream);
                }
            })
            .map_err(device_error)?;

        ready_rx
            .recv()
            .map_err(|_| OutputError::Device("audio thread exited during setup".into()))??;

        Ok(Self {
            producer,
            spent,
            sample_rate,
            channels,
            shutdown,
            stream_thread: Some(stream_thread),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl AudioOutput for CpalOutput {
    fn submit(&mut self, buffer: WaveformBuffer) -> Result<(), OutputError> {
        check_rate(&buffer, self.sample_rate)?;
        // Free whatever the callback has finished with
        while self.spent.pop().is_ok() {}
        self.producer.submit(buffer)
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.stream_thread.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("audio thread panicked");
            }
        }
    }
}

fn check_rate(buffer: &WaveformBuffer, sample_rate: u32) -> Result<(), OutputError> {
    if buffer.sample_rate() == sample_rate {
        Ok(())
    } else {
        Err(OutputError::SampleRateMismatch {
            expected: sample_rate,
            actual: buffer.sample_rate(),
        })
    }
}

fn device_error(err: impl std::fmt::Display) -> OutputError {
    OutputError::Device(err.to_string())
}

fn build_stream(
    sample_rate: u32,
    channels: u16,
    playhead: Playhead,
) -> Result<Stream, OutputError> {
    let unsupported = || OutputError::UnsupportedConfig {
        sample_rate,
        channels,
    };

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(OutputError::NoDevice)?;
    let supported = device
        .supported_output_configs()
        .map_err(device_error)?
        .filter(|range| {
            range.channels() == channels
                && range.min_sample_rate().0 <= sample_rate
                && sample_rate <= range.max_sample_rate().0
        })
        .max_by_key(|range| range.sample_format() == SampleFormat::I16)
        .ok_or_else(unsupported)?
        .with_sample_rate(SampleRate(sample_rate));

    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.into();
    log::info!(
        "opening output stream: {} Hz, {} channels, {:?}",
        config.sample_rate.0,
        config.channels,
        sample_format
    );

    let stream = match sample_format {
        SampleFormat::I16 => make_stream::<i16>(&device, &config, playhead),
        SampleFormat::I32 => make_stream::<i32>(&device, &config, playhead),
        SampleFormat::U16 => make_stream::<u16>(&device, &config, playhead),
        SampleFormat::F32 => make_stream::<f32>(&device, &config, playhead),
        SampleFormat::F64 => make_stream::<f64>(&device, &config, playhead),
        _ => Err(unsupported()),
    }?;
    stream.play().map_err(device_error)?;
    Ok(stream)
}

fn make_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut playhead: Playhead,
) -> Result<Stream, OutputError>
where
    T: SizedSample + FromSample<i16>,
{
    let channels = config.channels as usize;
    device
        .build_output_stream(
            config,
            move |output: &mut [T], _: &cpal::OutputCallbackInfo| playhead.fill(output, channels),
            |err| log::error!("audio stream error: {}", err),
            None,
        )
        .map_err(device_error)
}

/// Audio-thread side: the tone being played and how far into it we are
struct Playhead {
    incoming: Consumer<WaveformBuffer>,
    spent: Producer<WaveformBuffer>,
    current: Option<WaveformBuffer>,
    cursor: usize,
}

impl Playhead {
    fn new(incoming: Consumer<WaveformBuffer>, spent: Producer<WaveformBuffer>) -> Self {
        Self {
            incoming,
            spent,
            current: None,
            cursor: 0,
        }
    }

    /// Hand a tone back for freeing off the audio thread
    fn retire(&mut self) {
        if let Some(buffer) = self.current.take() {
            // Full only if the output has stopped draining; then it drops here
            let _ = self.spent.push(buffer);
        }
    }

    /// Fill an interleaved device buffer of `channels` channels
    fn fill<T>(&mut self, output: &mut [T], channels: usize)
    where
        T: Sample + FromSample<i16>,
    {
        // Newest tone wins
        while let Ok(buffer) = self.incoming.pop() {
            self.retire();
            self.current = Some(buffer);
            self.cursor = 0;
        }

        for frame in output.chunks_mut(channels.max(1)) {
            let sample = match &self.current {
                Some(buffer) if self.cursor < buffer.len() => {
                    let sample = buffer.samples()[self.cursor];
                    self.cursor += 1;
                    sample
                }
                _ => 0,
            };
            let value = T::from_sample(sample);
            for out in frame.iter_mut() {
                *out = value;
            }
        }

        if matches!(&self.current, Some(buffer) if self.cursor >= buffer.len()) {
            self.retire();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::generate_tone;

    fn playhead() -> (Producer<WaveformBuffer>, Consumer<WaveformBuffer>, Playhead) {
        let (tx, rx) = RingBuffer::new(QUEUE_CAPACITY);
        let (spent_tx, spent_rx) = RingBuffer::new(SPENT_CAPACITY);
        (tx, spent_rx, Playhead::new(rx, spent_tx))
    }

    #[test]
    fn silence_without_a_tone() {
        let (_tx, _spent, mut head) = playhead();
        let mut out = vec![7i16; 8];
        head.fill(&mut out, 2);
        assert!(out.iter().all(|&s| s == 0));
    }

    #[test]
    fn mono_is_copied_to_every_channel() {
        let (mut tx, _spent, mut head) = playhead();
        let tone = generate_tone(1_000.0, 0.004, 4_000).unwrap();
        tx.push(tone).unwrap();

        let mut out = vec![0i16; 8];
        head.fill(&mut out, 2);
        assert_eq!(out, [0, 0, 32_767, 32_767, 0, 0, -32_767, -32_767]);
    }

    #[test]
    fn playback_continues_across_callbacks_then_pads_with_silence() {
        let (mut tx, mut spent, mut head) = playhead();
        let tone = generate_tone(1_000.0, 0.001, 4_000).unwrap(); // 4 samples
        let expected = tone.samples().to_vec();
        tx.push(tone).unwrap();

        let mut first = vec![0i16; 3];
        head.fill(&mut first, 1);
        let mut second = vec![1i16; 3];
        head.fill(&mut second, 1);

        assert_eq!(&first[..], &expected[..3]);
        assert_eq!(second, [expected[3], 0, 0]);
        assert!(head.current.is_none());

        // The finished tone comes back instead of being freed in the callback
        assert_eq!(spent.pop().unwrap().samples(), &expected[..]);
        assert!(spent.pop().is_err());
    }

    #[test]
    fn newest_tone_replaces_the_sounding_one() {
        let (mut tx, mut spent, mut head) = playhead();
        tx.push(generate_tone(1_000.0, 0.004, 4_000).unwrap()).unwrap();
        let mut out = vec![0i16; 2];
        head.fill(&mut out, 1);

        let replacement = generate_tone(500.0, 0.004, 4_000).unwrap();
        let expected = replacement.samples()[..2].to_vec();
        tx.push(replacement).unwrap();
        head.fill(&mut out, 1);
        assert_eq!(out, expected);
        assert_eq!(spent.pop().unwrap().frequency(), 1_000.0);
        assert!(spent.pop().is_err());
    }

    #[test]
    fn buffers_are_retired_once_each() {
        let (mut tx, mut spent, mut head) = playhead();
        for frequency in [100.0, 200.0, 300.0] {
            tx.push(generate_tone(frequency, 0.001, 4_000).unwrap()).unwrap();
        }
        let mut out = vec![0i16; 8];
        head.fill(&mut out, 1);
        head.fill(&mut out, 1);

        let retired: Vec<f64> = std::iter::from_fn(|| spent.pop().ok())
            .map(|buffer| buffer.frequency())
            .collect();
        assert_eq!(retired, [100.0, 200.0, 300.0]);
    }

    #[test]
    fn mismatched_sample_rate_is_its_own_error() {
        let tone = generate_tone(440.0, 0.01, 44_100).unwrap();
        assert_eq!(
            check_rate(&tone, 22_050),
            Err(OutputError::SampleRateMismatch {
                expected: 22_050,
                actual: 44_100,
            })
        );
        assert!(check_rate(&tone, 44_100).is_ok());
    }

    #[test]
    fn converts_to_float_devices() {
        let (mut tx, _spent, mut head) = playhead();
        tx.push(generate_tone(1_000.0, 0.004, 4_000).unwrap()).unwrap();
        let mut out = vec![0.0f32; 4];
        head.fill(&mut out, 1);
        assert_eq!(out[0], 0.0);
        assert!(out[1] > 0.99 && out[1] <= 1.0);
        assert!(out[3] < -0.99 && out[3] >= -1.0);
    }
}

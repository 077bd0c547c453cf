use std::f64::consts::TAU;
use std::time::Duration;

use crate::error::EngineError;

/*
Tone Generation
===============

Every key press on the instrument becomes one plain sine tone, rendered up
front into a buffer of signed 16-bit samples and then handed to the audio
device as a whole.

  sample[i] = round(sin(2π · f · i / sr) · 32767)

where f is the note frequency and sr the sample rate. The buffer holds
floor(sr · duration) samples, so 0.5 s at 22050 Hz is 11025 samples.

Full scale is ±32767 rather than -32768..32767 so the wave stays symmetric
around zero.

Example usage:
  let tone = generate_tone(440.0, 0.5, 22_050)?;   // concert A, half a second
  assert_eq!(tone.len(), 11_025);
*/

/// Largest sample magnitude a tone reaches.
pub const FULL_SCALE: f64 = 32_767.0;

/// Longest buffer `generate_tone` will render (about 12 minutes at 22050 Hz).
pub const MAX_SAMPLES: usize = 1 << 24;

/// One synthesized tone: mono PCM samples plus the parameters that made them.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    frequency: f64,
}

impl WaveformBuffer {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency of the sine in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Playback length at the buffer's own sample rate
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Render a sine tone of `frequency` Hz lasting `duration` seconds.
///
/// Rejects non-positive or non-finite inputs, and durations that would round
/// down to an empty buffer or run past [`MAX_SAMPLES`].
pub fn generate_tone(
    frequency: f64,
    duration: f64,
    sample_rate: u32,
) -> Result<WaveformBuffer, EngineError> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(EngineError::invalid("frequency", frequency));
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(EngineError::invalid("duration", duration));
    }
    if sample_rate == 0 {
        return Err(EngineError::invalid("sample rate", sample_rate));
    }

    let len = (sample_rate as f64 * duration).floor();
    if len < 1.0 || len > MAX_SAMPLES as f64 {
        return Err(EngineError::invalid("duration", duration));
    }
    let len = len as usize;

    let rate = sample_rate as f64;
    let samples = (0..len)
        .map(|i| {
            let value = ((TAU * frequency * i as f64 / rate).sin() * FULL_SCALE).round();
            value.clamp(-FULL_SCALE, FULL_SCALE) as i16
        })
        .collect();

    Ok(WaveformBuffer {
        samples,
        sample_rate,
        frequency,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_is_floor_of_rate_times_duration() {
        assert_eq!(generate_tone(440.0, 0.5, 22_050).unwrap().len(), 11_025);
        assert_eq!(generate_tone(440.0, 0.1, 44_100).unwrap().len(), 4_410);
        // 22050 * 0.33333 = 7349.92...
        assert_eq!(generate_tone(440.0, 0.33333, 22_050).unwrap().len(), 7_349);
    }

    #[test]
    fn samples_stay_within_full_scale() {
        let tone = generate_tone(493.88 * 4.0, 0.5, 22_050).unwrap();
        assert!(tone
            .samples()
            .iter()
            .all(|&s| (-32_767..=32_767).contains(&s)));
    }

    #[test]
    fn generation_is_bit_exact() {
        let a = generate_tone(261.63, 0.5, 22_050).unwrap();
        let b = generate_tone(261.63, 0.5, 22_050).unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn valid_sine() {
        let sample_rate = 22_050;
        let frequency = 440.0;
        let tone = generate_tone(frequency, 0.01, sample_rate).unwrap();

        assert_eq!(tone.samples()[0], 0);
        let sample_index = 12;
        let expected = ((TAU * frequency * sample_index as f64 / sample_rate as f64).sin()
            * FULL_SCALE)
            .round() as i16;
        assert_eq!(tone.samples()[sample_index], expected);
    }

    #[test]
    fn quarter_rate_sine_hits_the_peaks() {
        // f = sr / 4 puts one sample on each quarter period
        let tone = generate_tone(1_000.0, 0.004, 4_000).unwrap();
        assert_eq!(&tone.samples()[..5], &[0, 32_767, 0, -32_767, 0]);
    }

    #[test]
    fn buffer_remembers_its_parameters() {
        let tone = generate_tone(261.63, 0.5, 22_050).unwrap();
        assert_eq!(tone.sample_rate(), 22_050);
        assert_eq!(tone.frequency(), 261.63);
        assert_eq!(tone.duration(), Duration::from_millis(500));
    }

    #[test]
    fn rejects_non_positive_inputs() {
        for (frequency, duration, rate, parameter) in [
            (0.0, 0.5, 22_050, "frequency"),
            (-440.0, 0.5, 22_050, "frequency"),
            (f64::NAN, 0.5, 22_050, "frequency"),
            (440.0, 0.0, 22_050, "duration"),
            (440.0, -1.0, 22_050, "duration"),
            (440.0, f64::INFINITY, 22_050, "duration"),
            (440.0, 0.5, 0, "sample rate"),
        ] {
            match generate_tone(frequency, duration, rate) {
                Err(EngineError::InvalidParameter { parameter: p, .. }) => {
                    assert_eq!(p, parameter)
                }
                other => panic!("expected InvalidParameter, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_durations_shorter_than_one_sample() {
        assert!(matches!(
            generate_tone(440.0, 1e-6, 22_050),
            Err(EngineError::InvalidParameter { parameter: "duration", .. })
        ));
    }

    #[test]
    fn rejects_durations_longer_than_the_buffer_limit() {
        for duration in [1e300, f64::MAX, (MAX_SAMPLES + 10) as f64 / 22_050.0] {
            assert!(matches!(
                generate_tone(440.0, duration, 22_050),
                Err(EngineError::InvalidParameter { parameter: "duration", .. })
            ));
        }
    }
}

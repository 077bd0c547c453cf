use std::thread;
use std::time::Duration;

use crate::{
    dsp::generate_tone,
    error::EngineError,
    io::AudioOutput,
    theory::{Note, NoteName, Octave},
    DEFAULT_FREQUENCY, NOTE_DURATION, SAMPLE_RATE,
};

/// Synthesis settings shared by every note the player renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub sample_rate: u32,
    pub note_duration: Duration,
    /// Reference-octave frequency for names missing from the note table
    pub default_frequency: f64,
}

impl PlayerConfig {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn note_duration(mut self, note_duration: Duration) -> Self {
        self.note_duration = note_duration;
        self
    }

    pub fn default_frequency(mut self, frequency: f64) -> Self {
        self.default_frequency = frequency;
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            note_duration: NOTE_DURATION,
            default_frequency: DEFAULT_FREQUENCY,
        }
    }
}

/// Waits out a chord note before the next one starts
pub trait Pacer: Send {
    fn wait(&mut self, duration: Duration);
}

/// Blocks the calling thread for the full duration
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn wait(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<F> Pacer for F
where
    F: FnMut(Duration) + Send,
{
    fn wait(&mut self, duration: Duration) {
        self(duration)
    }
}

/// A tone that was synthesized and handed to the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub name: NoteName,
    /// `None` when the name had no table entry and the default frequency was used
    pub note: Option<Note>,
    pub frequency: f64,
    pub duration: Duration,
}

/// Renders notes and submits them to an audio output.
///
/// Chords are played as arpeggios: each note starts only after the previous
/// one has had its full duration, and the call blocks until the last one is
/// done.
pub struct VoicePlayer<O: AudioOutput, P: Pacer = ThreadSleep> {
    output: O,
    pacer: P,
    config: PlayerConfig,
}

impl<O: AudioOutput> VoicePlayer<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            pacer: ThreadSleep,
            config: PlayerConfig::default(),
        }
    }
}

impl<O: AudioOutput, P: Pacer> VoicePlayer<O, P> {
    pub fn with_config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> VoicePlayer<O, Q> {
        VoicePlayer {
            output: self.output,
            pacer,
            config: self.config,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Frequency `name` sounds at in `octave`, falling back to the default
    /// frequency for names the note table does not know
    pub fn frequency_of(&self, name: NoteName, octave: Octave) -> f64 {
        match name.note() {
            Some(note) => note.frequency(octave),
            None => {
                log::warn!(
                    "no frequency for note {}, falling back to {} Hz",
                    name,
                    self.config.default_frequency
                );
                self.config.default_frequency * octave.factor()
            }
        }
    }

    /// Synthesize one note and submit it. Returns as soon as the output has
    /// accepted the buffer.
    pub fn play(&mut self, name: NoteName, octave: Octave) -> Result<Voice, EngineError> {
        let frequency = self.frequency_of(name, octave);
        let buffer = generate_tone(
            frequency,
            self.config.note_duration.as_secs_f64(),
            self.config.sample_rate,
        )?;
        let voice = Voice {
            name,
            note: name.note(),
            frequency,
            duration: buffer.duration(),
        };

        log::debug!(
            "playing {} at {:.2} Hz ({} samples)",
            name,
            frequency,
            buffer.len()
        );
        self.output.submit(buffer)?;
        Ok(voice)
    }

    /// Play `notes` one after another, waiting one note duration after each.
    ///
    /// An output failure stops the chord at the failing note.
    pub fn play_chord(
        &mut self,
        notes: &[NoteName],
        octave: Octave,
    ) -> Result<Vec<Voice>, EngineError> {
        let mut voices = Vec::with_capacity(notes.len());
        for &name in notes {
            voices.push(self.play(name, octave)?);
            self.pacer.wait(self.config.note_duration);
        }
        Ok(voices)
    }
}

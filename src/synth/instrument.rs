use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{
    message::{EventReceiver, InputEvent},
    player::{Pacer, ThreadSleep, Voice, VoicePlayer},
    state::{InstrumentState, StateSnapshot},
};
use crate::{
    error::EngineError,
    io::AudioOutput,
    theory::{chord_for, Letter, NoteName},
};

/// What a note button asks the player to do under a given state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackRequest {
    Single(NoteName),
    Chord(Vec<NoteName>),
}

impl PlaybackRequest {
    /// Decide what `letter` sounds like under `state`.
    ///
    /// Chord mode wins over sharp: the chord is always built on the natural
    /// root. Outside chord mode a held sharp raises the letter, unless the
    /// sharped name has no table entry (E#, B#), in which case the natural
    /// letter plays.
    pub fn resolve(state: &InstrumentState, letter: Letter) -> Self {
        let root = NoteName::natural(letter);
        if state.chord_mode() {
            return PlaybackRequest::Chord(chord_for(root, state.quality()));
        }
        if state.sharp_active() {
            let sharped = NoteName::sharp(letter);
            if sharped.note().is_some() {
                return PlaybackRequest::Single(sharped);
            }
            log::debug!("{} has no table entry, playing {}", sharped, root);
        }
        PlaybackRequest::Single(root)
    }

    pub fn notes(&self) -> &[NoteName] {
        match self {
            PlaybackRequest::Single(note) => std::slice::from_ref(note),
            PlaybackRequest::Chord(notes) => notes,
        }
    }
}

/// Result of handling one input event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    State(StateSnapshot),
    Played(Vec<Voice>),
}

/// The instrument: modifier state plus a voice player, driven by input events.
///
/// Every method takes `&self`, so one instrument can be shared between the
/// threads that deliver button events. State and player sit behind separate
/// locks: modifier buttons never wait for a chord, while a note press waits
/// for any chord still being played.
pub struct Instrument<O: AudioOutput, P: Pacer = ThreadSleep> {
    state: Mutex<InstrumentState>,
    player: Mutex<VoicePlayer<O, P>>,
}

impl<O: AudioOutput, P: Pacer> Instrument<O, P> {
    pub fn new(player: VoicePlayer<O, P>) -> Self {
        Self {
            state: Mutex::new(InstrumentState::default()),
            player: Mutex::new(player),
        }
    }

    /// Copy of the current modifier state
    pub fn snapshot(&self) -> InstrumentState {
        *lock(&self.state)
    }

    pub fn handle(&self, event: InputEvent) -> Result<Outcome, EngineError> {
        match event {
            InputEvent::NotePressed(letter) => self.on_note_event(letter).map(Outcome::Played),
            InputEvent::OctaveSelected(octave) => self.set_octave(octave).map(Outcome::State),
            InputEvent::SharpPressed => Ok(Outcome::State(self.set_sharp(true))),
            InputEvent::SharpReleased => Ok(Outcome::State(self.set_sharp(false))),
            InputEvent::ChordTogglePressed => Ok(Outcome::State(self.toggle_chord_mode())),
            InputEvent::MinorMajorTogglePressed => {
                Ok(Outcome::State(self.toggle_minor_major()))
            }
        }
    }

    /// Handle every event waiting in `receiver`, reporting each result to
    /// `on_outcome`. Returns how many events were handled.
    pub fn drain<R, F>(&self, receiver: &mut R, mut on_outcome: F) -> usize
    where
        R: EventReceiver + ?Sized,
        F: FnMut(InputEvent, Result<Outcome, EngineError>),
    {
        let mut handled = 0;
        while let Some(event) = receiver.pop() {
            on_outcome(event, self.handle(event));
            handled += 1;
        }
        handled
    }

    /// Play whatever `letter` means under the current state
    pub fn on_note_event(&self, letter: Letter) -> Result<Vec<Voice>, EngineError> {
        // State is read once; modifier changes during a chord apply to the next press
        let state = self.snapshot();
        let request = PlaybackRequest::resolve(&state, letter);
        let octave = state.octave();

        let mut player = lock(&self.player);
        match request {
            PlaybackRequest::Single(note) => player.play(note, octave).map(|voice| vec![voice]),
            PlaybackRequest::Chord(notes) => player.play_chord(&notes, octave),
        }
    }

    pub fn set_octave(&self, octave: u8) -> Result<StateSnapshot, EngineError> {
        lock(&self.state).set_octave(octave)
    }

    pub fn set_sharp(&self, active: bool) -> StateSnapshot {
        lock(&self.state).set_sharp(active)
    }

    pub fn toggle_chord_mode(&self) -> StateSnapshot {
        lock(&self.state).toggle_chord_mode()
    }

    pub fn toggle_minor_major(&self) -> StateSnapshot {
        lock(&self.state).toggle_minor_major()
    }

    /// Run `f` with exclusive access to the player (waits for any chord in flight)
    pub fn with_player<T>(&self, f: impl FnOnce(&mut VoicePlayer<O, P>) -> T) -> T {
        f(&mut lock(&self.player))
    }

    pub fn into_player(self) -> VoicePlayer<O, P> {
        self.player
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The guarded data are plain values with no multi-step invariants, so a
/// panic on another thread cannot leave them half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dsp::WaveformBuffer, synth::state::StateChange, theory::Octave};
    use std::time::Duration;

    fn names(request: &PlaybackRequest) -> Vec<String> {
        request.notes().iter().map(ToString::to_string).collect()
    }

    fn instrument() -> Instrument<Vec<WaveformBuffer>, fn(Duration)> {
        let recorder: Vec<WaveformBuffer> = Vec::new();
        Instrument::new(VoicePlayer::new(recorder).with_pacer(no_wait as fn(Duration)))
    }

    fn no_wait(_: Duration) {}

    #[test]
    fn plain_press_plays_the_natural() {
        let state = InstrumentState::new();
        assert_eq!(
            PlaybackRequest::resolve(&state, Letter::C),
            PlaybackRequest::Single(NoteName::natural(Letter::C))
        );
    }

    #[test]
    fn held_sharp_raises_the_note() {
        let mut state = InstrumentState::new();
        state.set_sharp(true);
        assert_eq!(names(&PlaybackRequest::resolve(&state, Letter::F)), ["F#"]);
        assert_eq!(names(&PlaybackRequest::resolve(&state, Letter::A)), ["A#"]);
        state.set_sharp(false);
        assert_eq!(names(&PlaybackRequest::resolve(&state, Letter::F)), ["F"]);
    }

    #[test]
    fn sharp_without_table_entry_falls_back_to_the_natural() {
        let mut state = InstrumentState::new();
        state.set_sharp(true);
        assert_eq!(names(&PlaybackRequest::resolve(&state, Letter::E)), ["E"]);
        assert_eq!(names(&PlaybackRequest::resolve(&state, Letter::B)), ["B"]);
    }

    #[test]
    fn chord_mode_ignores_sharp() {
        let mut state = InstrumentState::new();
        state.toggle_chord_mode();
        state.set_sharp(true);
        assert_eq!(
            names(&PlaybackRequest::resolve(&state, Letter::C)),
            ["C", "E", "G"]
        );
        state.toggle_minor_major();
        assert_eq!(
            names(&PlaybackRequest::resolve(&state, Letter::C)),
            ["C", "Eb", "G"]
        );
    }

    #[test]
    fn handle_routes_modifiers_to_state() {
        let instrument = instrument();
        match instrument.handle(InputEvent::OctaveSelected(5)).unwrap() {
            Outcome::State(snapshot) => {
                assert_eq!(snapshot.change, StateChange::Octave(Octave::new(5).unwrap()))
            }
            other => panic!("expected a state change, got {other:?}"),
        }
        instrument.handle(InputEvent::SharpPressed).unwrap();
        instrument.handle(InputEvent::ChordTogglePressed).unwrap();
        instrument.handle(InputEvent::MinorMajorTogglePressed).unwrap();

        let state = instrument.snapshot();
        assert_eq!(state.octave().get(), 5);
        assert!(state.sharp_active() && state.chord_mode() && state.is_minor());

        instrument.handle(InputEvent::SharpReleased).unwrap();
        assert!(!instrument.snapshot().sharp_active());
        assert!(instrument.with_player(|p| p.output().is_empty()));
    }

    #[test]
    fn unsupported_octave_is_reported_and_ignored() {
        let instrument = instrument();
        assert!(matches!(
            instrument.handle(InputEvent::OctaveSelected(2)),
            Err(EngineError::InvalidParameter { parameter: "octave", .. })
        ));
        assert_eq!(instrument.snapshot().octave().get(), 4);
    }

    #[test]
    fn note_press_uses_current_octave() {
        let instrument = instrument();
        instrument.set_octave(5).unwrap();
        let voices = instrument.on_note_event(Letter::A).unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].frequency, 880.0);
    }

    #[test]
    fn chord_press_plays_every_note() {
        let instrument = instrument();
        instrument.toggle_chord_mode();
        match instrument.handle(InputEvent::NotePressed(Letter::G)).unwrap() {
            Outcome::Played(voices) => {
                let played: Vec<String> = voices.iter().map(|v| v.name.to_string()).collect();
                assert_eq!(played, ["G", "B", "D"]);
            }
            other => panic!("expected playback, got {other:?}"),
        }
        let frequencies: Vec<f64> = instrument
            .into_player()
            .into_output()
            .iter()
            .map(WaveformBuffer::frequency)
            .collect();
        assert_eq!(frequencies, [392.0, 493.88, 293.66]);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn drain_handles_queued_events_in_order() {
        let instrument = instrument();
        let (mut tx, mut rx) = rtrb::RingBuffer::<InputEvent>::new(8);
        for event in [
            InputEvent::OctaveSelected(3),
            InputEvent::OctaveSelected(9),
            InputEvent::NotePressed(Letter::C),
        ] {
            tx.push(event).unwrap();
        }

        let mut seen = Vec::new();
        let handled = instrument.drain(&mut rx, |event, result| seen.push((event, result.is_ok())));

        assert_eq!(handled, 3);
        assert_eq!(
            seen,
            [
                (InputEvent::OctaveSelected(3), true),
                (InputEvent::OctaveSelected(9), false),
                (InputEvent::NotePressed(Letter::C), true),
            ]
        );
        let frequency = instrument.with_player(|p| p.output()[0].frequency());
        assert!((frequency - 261.63 / 2.0).abs() < 1e-9);
    }
}

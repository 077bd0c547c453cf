//! Modifier state of the instrument.
//!
//! Four independent controls decide what a note button produces:
//!
//! - octave: selected by four dedicated buttons, last press wins
//! - sharp: momentary, active only while the sharp button is held
//! - chord mode: toggled on each press
//! - major/minor: toggled on each press
//!
//! No combination is forbidden. Every mutation returns a [`StateSnapshot`]
//! and logs its status line.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::{
    error::EngineError,
    theory::{ChordQuality, Octave},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstrumentState {
    octave: Octave,
    sharp_active: bool,
    chord_mode: bool,
    quality: ChordQuality,
}

impl InstrumentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn octave(&self) -> Octave {
        self.octave
    }

    pub fn sharp_active(&self) -> bool {
        self.sharp_active
    }

    pub fn chord_mode(&self) -> bool {
        self.chord_mode
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }

    pub fn is_minor(&self) -> bool {
        self.quality.is_minor()
    }

    /// Select octave `octave`; unsupported values leave the state untouched
    pub fn set_octave(&mut self, octave: u8) -> Result<StateSnapshot, EngineError> {
        self.octave = Octave::new(octave)?;
        Ok(self.record(StateChange::Octave(self.octave)))
    }

    pub fn set_sharp(&mut self, active: bool) -> StateSnapshot {
        self.sharp_active = active;
        self.record(StateChange::Sharp(active))
    }

    pub fn toggle_chord_mode(&mut self) -> StateSnapshot {
        self.chord_mode = !self.chord_mode;
        self.record(StateChange::ChordMode(self.chord_mode))
    }

    pub fn toggle_minor_major(&mut self) -> StateSnapshot {
        self.quality = self.quality.toggled();
        self.record(StateChange::Quality(self.quality))
    }

    fn record(&self, change: StateChange) -> StateSnapshot {
        log::info!("{}", change);
        StateSnapshot {
            change,
            state: *self,
        }
    }
}

/// The field a mutation touched and its new value
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Octave(Octave),
    Sharp(bool),
    ChordMode(bool),
    Quality(ChordQuality),
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateChange::Octave(octave) => write!(f, "Current octave: {}", octave),
            StateChange::Sharp(true) => write!(f, "Sharp button pressed"),
            StateChange::Sharp(false) => write!(f, "Sharp button released"),
            StateChange::ChordMode(true) => write!(f, "Chord mode: Enabled"),
            StateChange::ChordMode(false) => write!(f, "Chord mode: Disabled"),
            StateChange::Quality(quality) => write!(f, "Chord type: {}", quality),
        }
    }
}

/// Result of a mutation: what changed, and the whole state afterwards
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSnapshot {
    pub change: StateChange,
    pub state: InstrumentState,
}

impl fmt::Display for StateSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.change, f)
    }
}

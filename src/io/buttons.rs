//! Physical controls of the instrument and what their edges mean.
//!
//! Debouncing and edge detection happen in the GPIO layer; this table only
//! turns a clean press or release of a named control into an [`InputEvent`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::{synth::message::InputEvent, theory::Letter};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// One button on the board
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Note(Letter),
    Octave(u8),
    Sharp,
    ChordToggle,
    MinorMajorToggle,
}

impl Control {
    pub const ALL: [Control; 14] = [
        Control::Note(Letter::C),
        Control::Note(Letter::D),
        Control::Note(Letter::E),
        Control::Note(Letter::F),
        Control::Note(Letter::G),
        Control::Note(Letter::A),
        Control::Note(Letter::B),
        Control::Octave(3),
        Control::Octave(4),
        Control::Octave(5),
        Control::Octave(6),
        Control::Sharp,
        Control::ChordToggle,
        Control::MinorMajorToggle,
    ];

    /// The event this control emits on `edge`, if any.
    ///
    /// Only the sharp button is momentary; every other control acts on press.
    pub fn event(self, edge: ButtonEdge) -> Option<InputEvent> {
        match (self, edge) {
            (Control::Note(letter), ButtonEdge::Pressed) => Some(InputEvent::NotePressed(letter)),
            (Control::Octave(octave), ButtonEdge::Pressed) => {
                Some(InputEvent::OctaveSelected(octave))
            }
            (Control::Sharp, ButtonEdge::Pressed) => Some(InputEvent::SharpPressed),
            (Control::Sharp, ButtonEdge::Released) => Some(InputEvent::SharpReleased),
            (Control::ChordToggle, ButtonEdge::Pressed) => Some(InputEvent::ChordTogglePressed),
            (Control::MinorMajorToggle, ButtonEdge::Pressed) => {
                Some(InputEvent::MinorMajorTogglePressed)
            }
            (_, ButtonEdge::Released) => None,
        }
    }

    /// Default wiring: BCM GPIO pin the button is connected to
    pub fn default_pin(self) -> Option<u8> {
        let pin = match self {
            Control::Note(Letter::C) => 17,
            Control::Note(Letter::D) => 27,
            Control::Note(Letter::E) => 22,
            Control::Note(Letter::F) => 5,
            Control::Note(Letter::G) => 6,
            Control::Note(Letter::A) => 13,
            Control::Note(Letter::B) => 19,
            Control::Octave(3) => 26,
            Control::Octave(4) => 21,
            Control::Octave(5) => 20,
            Control::Octave(6) => 16,
            Control::Octave(_) => return None,
            Control::Sharp => 12,
            Control::ChordToggle => 25,
            Control::MinorMajorToggle => 24,
        };
        Some(pin)
    }

    /// Reverse of [`Control::default_pin`]
    pub fn from_pin(pin: u8) -> Option<Control> {
        Control::ALL
            .into_iter()
            .find(|control| control.default_pin() == Some(pin))
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Note(letter) => write!(f, "note {}", letter.as_char()),
            Control::Octave(octave) => write!(f, "octave {}", octave),
            Control::Sharp => write!(f, "sharp"),
            Control::ChordToggle => write!(f, "chord mode"),
            Control::MinorMajorToggle => write!(f, "major/minor"),
        }
    }
}

/*
Notes and Octaves
=================

The instrument has seven note buttons, one per natural letter, and a sharp
button that raises the pressed letter by a semitone while held. Chords add
flat spellings on top (C minor is C, Eb, G).

Vocabulary:
- Letter:     C D E F G A B, one per note button
- NoteName:   a letter plus an accidental, spelled the way it is shown (C#, Eb)
- Note:       one of the 12 chromatic pitch classes, with a fixed frequency
- Octave:     3 to 6; octave 4 is the reference the frequency table is written in

Resolution:
  A NoteName resolves to a Note when it is one of the 12 canonical names
  (C C# D D# E F F# G G# A A# B) or the flat alias of a black key
  (Db Eb Gb Ab Bb). E#, B#, Cb and Fb have no table entry.

Reference frequencies (octave 4, Hz):
  C 261.63  C# 277.18  D 293.66  D# 311.13  E 329.63  F 349.23
  F# 369.99 G 392.00   G# 415.30 A 440.00   A# 466.16 B 493.88

Each octave step doubles or halves the frequency:
  frequency = reference * 2^(octave - 4)
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::{error::EngineError, REFERENCE_OCTAVE};

/// Natural note letter, one per note button
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitones above C
    const fn semitone(self) -> u8 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A spelled note: letter plus accidental
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: Accidental,
}

impl NoteName {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self { letter, accidental }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    pub const fn sharp(letter: Letter) -> Self {
        Self::new(letter, Accidental::Sharp)
    }

    pub const fn flat(letter: Letter) -> Self {
        Self::new(letter, Accidental::Flat)
    }

    pub fn is_natural(self) -> bool {
        self.accidental == Accidental::Natural
    }

    /// Look up the pitch class this spelling stands for, if the table has it
    pub fn note(self) -> Option<Note> {
        let base = self.letter.semitone();
        let semitone = match self.accidental {
            Accidental::Natural => base,
            // E# and B# would land on a natural
            Accidental::Sharp if matches!(self.letter, Letter::E | Letter::B) => return None,
            Accidental::Sharp => base + 1,
            // Cb and Fb likewise
            Accidental::Flat if matches!(self.letter, Letter::C | Letter::F) => return None,
            Accidental::Flat => base - 1,
        };
        Some(Note::ALL[semitone as usize])
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter.as_char())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => write!(f, "#"),
            Accidental::Flat => write!(f, "b"),
        }
    }
}

/// Error for strings that are not a letter optionally followed by `#` or `b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNoteError {
    input: String,
}

impl fmt::Display for ParseNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid note name {:?}: expected a letter A-G followed by an optional '#' or 'b'",
            self.input
        )
    }
}

impl std::error::Error for ParseNoteError {}

impl FromStr for NoteName {
    type Err = ParseNoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNoteError {
            input: s.to_string(),
        };
        let mut chars = s.trim().chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(err)?;
        let accidental = match chars.next() {
            None => Accidental::Natural,
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            Some(_) => return Err(err()),
        };
        if chars.next().is_some() {
            return Err(err());
        }
        Ok(NoteName::new(letter, accidental))
    }
}

/// One of the 12 chromatic pitch classes
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Note {
    /// Chromatic order starting at C
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Frequency in Hz at the reference octave
    pub const fn reference_frequency(self) -> f64 {
        match self {
            Note::C => 261.63,
            Note::Cs => 277.18,
            Note::D => 293.66,
            Note::Ds => 311.13,
            Note::E => 329.63,
            Note::F => 349.23,
            Note::Fs => 369.99,
            Note::G => 392.00,
            Note::Gs => 415.30,
            Note::A => 440.00,
            Note::As => 466.16,
            Note::B => 493.88,
        }
    }

    /// Frequency in Hz at `octave`
    pub fn frequency(self, octave: Octave) -> f64 {
        self.reference_frequency() * octave.factor()
    }

    /// Canonical spelling (sharps for the black keys)
    pub const fn name(self) -> NoteName {
        match self {
            Note::C => NoteName::natural(Letter::C),
            Note::Cs => NoteName::sharp(Letter::C),
            Note::D => NoteName::natural(Letter::D),
            Note::Ds => NoteName::sharp(Letter::D),
            Note::E => NoteName::natural(Letter::E),
            Note::F => NoteName::natural(Letter::F),
            Note::Fs => NoteName::sharp(Letter::F),
            Note::G => NoteName::natural(Letter::G),
            Note::Gs => NoteName::sharp(Letter::G),
            Note::A => NoteName::natural(Letter::A),
            Note::As => NoteName::sharp(Letter::A),
            Note::B => NoteName::natural(Letter::B),
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.name(), f)
    }
}

/// Octave selector, one value per octave button
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Octave(u8);

impl Octave {
    pub const SUPPORTED: RangeInclusive<u8> = 3..=6;
    pub const REFERENCE: Octave = Octave(REFERENCE_OCTAVE);

    pub fn new(octave: u8) -> Result<Self, EngineError> {
        if Self::SUPPORTED.contains(&octave) {
            Ok(Octave(octave))
        } else {
            Err(EngineError::invalid("octave", octave))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Frequency multiplier relative to the reference octave: 2^(octave - 4)
    pub fn factor(self) -> f64 {
        2.0_f64.powi(self.0 as i32 - REFERENCE_OCTAVE as i32)
    }
}

impl Default for Octave {
    fn default() -> Self {
        Octave::REFERENCE
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

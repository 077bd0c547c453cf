//! Triad lookup for chord mode.
//!
//! Each natural root maps to a fixed major and minor triad, spelled the way a
//! musician would write them (C minor uses Eb, not D#). Roots with an
//! accidental have no entry and sound as the root alone.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use super::notes::{Letter, NoteName};

/// Major or minor triad, switched by the major/minor button
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChordQuality {
    #[default]
    Major,
    Minor,
}

impl ChordQuality {
    pub fn toggled(self) -> Self {
        match self {
            ChordQuality::Major => ChordQuality::Minor,
            ChordQuality::Minor => ChordQuality::Major,
        }
    }

    pub fn is_minor(self) -> bool {
        self == ChordQuality::Minor
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordQuality::Major => write!(f, "Major"),
            ChordQuality::Minor => write!(f, "Minor"),
        }
    }
}

struct Triads {
    major: [NoteName; 3],
    minor: [NoteName; 3],
}

const fn n(letter: Letter) -> NoteName {
    NoteName::natural(letter)
}

const fn s(letter: Letter) -> NoteName {
    NoteName::sharp(letter)
}

const fn b(letter: Letter) -> NoteName {
    NoteName::flat(letter)
}

const fn triads(letter: Letter) -> Triads {
    use Letter::*;
    match letter {
        C => Triads {
            major: [n(C), n(E), n(G)],
            minor: [n(C), b(E), n(G)],
        },
        D => Triads {
            major: [n(D), s(F), n(A)],
            minor: [n(D), n(F), n(A)],
        },
        E => Triads {
            major: [n(E), s(G), n(B)],
            minor: [n(E), n(G), n(B)],
        },
        F => Triads {
            major: [n(F), n(A), n(C)],
            minor: [n(F), b(A), n(C)],
        },
        G => Triads {
            major: [n(G), n(B), n(D)],
            minor: [n(G), b(B), n(D)],
        },
        A => Triads {
            major: [n(A), s(C), n(E)],
            minor: [n(A), n(C), n(E)],
        },
        B => Triads {
            major: [n(B), s(D), s(F)],
            minor: [n(B), n(D), s(F)],
        },
    }
}

/// Notes of the chord built on `root`, root first.
///
/// Only natural roots have a triad; anything else comes back as `[root]`.
pub fn chord_for(root: NoteName, quality: ChordQuality) -> Vec<NoteName> {
    if !root.is_natural() {
        return vec![root];
    }
    let entry = triads(root.letter);
    match quality {
        ChordQuality::Major => entry.major.to_vec(),
        ChordQuality::Minor => entry.minor.to_vec(),
    }
}

pub mod chords;
pub mod notes;

pub use chords::{chord_for, ChordQuality};
pub use notes::{Accidental, Letter, Note, NoteName, Octave, ParseNoteError};

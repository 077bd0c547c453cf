#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::theory::Letter;

/// Everything a button can ask of the instrument
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    NotePressed(Letter),
    OctaveSelected(u8),
    SharpPressed,
    SharpReleased,
    ChordTogglePressed,
    MinorMajorTogglePressed,
}

pub trait EventReceiver {
    fn pop(&mut self) -> Option<InputEvent>;
}

#[cfg(feature = "rtrb")]
impl EventReceiver for Consumer<InputEvent> {
    fn pop(&mut self) -> Option<InputEvent> {
        Consumer::pop(self).ok()
    }
}

// Purpose: instrument state, voice playback and event dispatch
// This layer sits above tone synthesis and turns button events into sound

pub mod instrument;
pub mod message;
pub mod player;
pub mod state;

pub use instrument::{Instrument, Outcome, PlaybackRequest};
pub use message::{EventReceiver, InputEvent};
pub use player::{Pacer, PlayerConfig, ThreadSleep, Voice, VoicePlayer};
pub use state::{InstrumentState, StateChange, StateSnapshot};

//! Keyboard stand-ins for the board's buttons

use std::io::{self, stdout};

use crossterm::{
    event::{
        KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};

use chordboard::{
    io::buttons::{ButtonEdge, Control},
    synth::InputEvent,
    theory::Letter,
};

/// Ask the terminal to report key releases. Returns `false` when it can't.
pub fn enable_release_events() -> io::Result<bool> {
    if !supports_keyboard_enhancement()? {
        return Ok(false);
    }
    execute!(
        stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )?;
    Ok(true)
}

pub fn disable_release_events() -> io::Result<()> {
    execute!(stdout(), PopKeyboardEnhancementFlags)
}

/// Maps key events to button events.
///
/// Sharp is a held button on the board. Terminals that don't report
/// releases get a latch instead: the first press holds it, the second lets go.
pub struct Keymap {
    release_events: bool,
    sharp_latched: bool,
}

impl Keymap {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            sharp_latched: false,
        }
    }

    pub fn release_events(&self) -> bool {
        self.release_events
    }

    pub fn control_for(code: KeyCode) -> Option<Control> {
        let KeyCode::Char(c) = code else {
            return None;
        };
        match c.to_ascii_lowercase() {
            's' => Some(Control::Sharp),
            'h' => Some(Control::ChordToggle),
            'm' => Some(Control::MinorMajorToggle),
            d @ '3'..='6' => d.to_digit(10).map(|n| Control::Octave(n as u8)),
            other => Letter::from_char(other).map(Control::Note),
        }
    }

    pub fn translate(&mut self, key: KeyEvent) -> Option<InputEvent> {
        let control = Self::control_for(key.code)?;
        let mut edge = match key.kind {
            KeyEventKind::Press => ButtonEdge::Pressed,
            KeyEventKind::Release => ButtonEdge::Released,
            KeyEventKind::Repeat => return None,
        };

        if control == Control::Sharp && !self.release_events {
            if edge == ButtonEdge::Released {
                return None;
            }
            self.sharp_latched = !self.sharp_latched;
            if !self.sharp_latched {
                edge = ButtonEdge::Released;
            }
        }

        control.event(edge)
    }
}

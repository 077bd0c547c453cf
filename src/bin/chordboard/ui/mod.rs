//! TUI module for chordboard
//!
//! Turns key presses into button events and shows what the instrument did.

mod status;
mod waveform;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use chordboard::{
    dsp::generate_tone,
    synth::{InputEvent, Outcome, Voice},
};

use crate::app::{BoardInstrument, Report};
use crate::keymap::Keymap;

use status::render_status;
use waveform::render_waveform;

/// Status lines kept on screen
const HISTORY_LEN: usize = 64;
/// Seconds of the last tone drawn in the oscilloscope
const SCOPE_WINDOW: f64 = 0.01;

/// UI application state
pub struct UiApp {
    instrument: Arc<BoardInstrument>,
    /// Button events for the dispatcher thread
    events: Producer<InputEvent>,
    /// Results coming back from the dispatcher thread
    reports: Consumer<Report>,
    keymap: Keymap,
    sample_rate: u32,
    history: VecDeque<String>,
    last_voice: Option<Voice>,
    /// Last tone, normalized to -1.0..=1.0
    scope: Vec<f64>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        instrument: Arc<BoardInstrument>,
        events: Producer<InputEvent>,
        reports: Consumer<Report>,
        keymap: Keymap,
        sample_rate: u32,
    ) -> Self {
        Self {
            instrument,
            events,
            reports,
            keymap,
            sample_rate,
            history: VecDeque::with_capacity(HISTORY_LEN),
            last_voice: None,
            scope: Vec::new(),
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_reports();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        Ok(())
    }

    fn poll_reports(&mut self) {
        while let Ok(report) = self.reports.pop() {
            let line = match report.result {
                Ok(Outcome::State(snapshot)) => snapshot.to_string(),
                Ok(Outcome::Played(voices)) => {
                    let line = describe(&voices);
                    if let Some(voice) = voices.last() {
                        self.show_voice(*voice);
                    }
                    line
                }
                Err(err) => format!("{:?} failed: {}", report.event, err),
            };
            self.push_history(line);
        }
    }

    fn show_voice(&mut self, voice: Voice) {
        match generate_tone(voice.frequency, SCOPE_WINDOW, self.sample_rate) {
            Ok(tone) => {
                self.scope = tone
                    .samples()
                    .iter()
                    .map(|&s| s as f64 / i16::MAX as f64)
                    .collect();
            }
            Err(err) => log::warn!("can't draw {}: {}", voice.name, err),
        }
        self.last_voice = Some(voice);
    }

    fn push_history(&mut self, line: String) {
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(line);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Press
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        {
            self.should_quit = true;
            return;
        }

        let Some(event) = self.keymap.translate(key) else {
            return;
        };
        if self.events.push(event).is_err() {
            log::warn!("input queue full, dropped {:?}", event);
            self.push_history(format!("Busy, dropped {:?}", event));
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Min(8),     // Waveform
                Constraint::Length(10), // History
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        render_status(
            frame,
            chunks[0],
            &self.instrument.snapshot(),
            self.last_voice.as_ref(),
        );

        let title = match &self.last_voice {
            Some(voice) => format!(" {} {:.2} Hz ", voice.name, voice.frequency),
            None => " Waveform ".to_string(),
        };
        render_waveform(frame, chunks[1], &title, &self.scope);

        // Newest at the top
        let visible = chunks[2].height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .history
            .iter()
            .rev()
            .take(visible)
            .map(|line| ListItem::new(line.as_str()))
            .collect();
        let history =
            List::new(items).block(Block::default().title(" Status ").borders(Borders::ALL));
        frame.render_widget(history, chunks[2]);

        let sharp_hint = if self.keymap.release_events() {
            "[S] Sharp (hold)"
        } else {
            "[S] Sharp (toggle)"
        };
        let help = Paragraph::new(format!(
            " [A-G] Note  [3-6] Octave  {}  [H] Chord  [M] Minor/Major  [Q] Quit",
            sharp_hint
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

fn describe(voices: &[Voice]) -> String {
    match voices {
        [voice] => format!("Played {} ({:.2} Hz)", voice.name, voice.frequency),
        _ => {
            let names: Vec<String> = voices.iter().map(|v| v.name.to_string()).collect();
            format!("Played chord {}", names.join(" "))
        }
    }
}

//! Status bar widget - octave, modifiers and the last note played

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use chordboard::synth::{InstrumentState, Voice};

fn flag(label: &str, on: bool) -> Span<'static> {
    let (symbol, color) = if on {
        ("●", Color::Green)
    } else {
        ("○", Color::DarkGray)
    };
    Span::styled(format!("{} {}  ", symbol, label), Style::default().fg(color))
}

pub fn render_status(frame: &mut Frame, area: Rect, state: &InstrumentState, last: Option<&Voice>) {
    let block = Block::default().title(" chordboard ").borders(Borders::ALL);

    let mut spans = vec![
        Span::styled(
            format!(" Octave: {}  ", state.octave()),
            Style::default().fg(Color::Cyan),
        ),
        flag("Sharp", state.sharp_active()),
        flag("Chord", state.chord_mode()),
        Span::styled(
            format!("{}  ", state.quality()),
            Style::default().fg(if state.is_minor() {
                Color::Magenta
            } else {
                Color::Yellow
            }),
        ),
    ];
    if let Some(voice) = last {
        spans.push(Span::styled(
            format!("Last: {} {:.2} Hz", voice.name, voice.frequency),
            Style::default().fg(Color::White),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

//! Chordboard - application builder and runner

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::{Consumer, Producer, RingBuffer};

use chordboard::{
    io::device::CpalOutput,
    synth::{InputEvent, Instrument, Outcome, PlayerConfig, VoicePlayer},
    EngineError, OUTPUT_CHANNELS,
};

use super::keymap::{self, Keymap};
use super::ui::UiApp;

/// Button events waiting for the dispatcher
const EVENT_QUEUE: usize = 64;
/// Dispatch results waiting for the UI
const REPORT_QUEUE: usize = 64;
/// Dispatcher sleep when no events are queued
const IDLE_POLL: Duration = Duration::from_millis(2);

/// The instrument as the binary runs it
pub type BoardInstrument = Instrument<CpalOutput>;

/// One handled event, sent from the dispatcher thread to the UI
pub struct Report {
    pub event: InputEvent,
    pub result: Result<Outcome, EngineError>,
}

/// Main application builder
pub struct Chordboard {
    config: PlayerConfig,
}

impl Chordboard {
    pub fn new() -> Self {
        Self {
            config: PlayerConfig::default(),
        }
    }

    /// Output sample rate in Hz
    #[allow(dead_code)]
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config = self.config.sample_rate(sample_rate);
        self
    }

    /// Length of every note, and the gap between chord notes
    #[allow(dead_code)]
    pub fn note_duration(mut self, note_duration: Duration) -> Self {
        self.config = self.config.note_duration(note_duration);
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let output = CpalOutput::open(self.config.sample_rate, OUTPUT_CHANNELS)
            .wrap_err("failed to open audio output")?;
        log::info!(
            "audio output ready: {} Hz, {} channels",
            output.sample_rate(),
            output.channels()
        );

        let sample_rate = self.config.sample_rate;
        let instrument = Arc::new(Instrument::new(
            VoicePlayer::new(output).with_config(self.config),
        ));
        let (event_tx, event_rx) = RingBuffer::<InputEvent>::new(EVENT_QUEUE);
        let (report_tx, report_rx) = RingBuffer::<Report>::new(REPORT_QUEUE);
        let running = Arc::new(AtomicBool::new(true));

        let dispatcher = spawn_dispatcher(
            Arc::clone(&instrument),
            event_rx,
            report_tx,
            Arc::clone(&running),
        )?;

        let mut terminal = ratatui::init();
        let result = keymap::enable_release_events()
            .wrap_err("failed to configure keyboard")
            .and_then(|release_events| {
                let keys = Keymap::new(release_events);
                let mut app = UiApp::new(
                    Arc::clone(&instrument),
                    event_tx,
                    report_rx,
                    keys,
                    sample_rate,
                );
                let result = app.run(&mut terminal);
                if release_events {
                    if let Err(err) = keymap::disable_release_events() {
                        log::warn!("failed to restore keyboard flags: {}", err);
                    }
                }
                result
            });
        ratatui::restore();

        // A chord in flight finishes before the dispatcher sees the flag
        running.store(false, Ordering::Release);
        dispatcher
            .join()
            .map_err(|_| eyre!("dispatcher thread panicked"))?;
        result
    }
}

impl Default for Chordboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle button events off the UI thread; chords block here, not in the UI
fn spawn_dispatcher(
    instrument: Arc<BoardInstrument>,
    mut events: Consumer<InputEvent>,
    mut reports: Producer<Report>,
    running: Arc<AtomicBool>,
) -> EyreResult<JoinHandle<()>> {
    thread::Builder::new()
        .name("chordboard-dispatch".into())
        .spawn(move || {
            while running.load(Ordering::Acquire) {
                let handled = instrument.drain(&mut events, |event, result| {
                    if let Err(err) = &result {
                        log::error!("{:?} failed: {}", event, err);
                    }
                    if reports.push(Report { event, result }).is_err() {
                        log::warn!("UI is not keeping up, dropped report for {:?}", event);
                    }
                });
                if handled == 0 {
                    thread::sleep(IDLE_POLL);
                }
            }
        })
        .wrap_err("failed to start dispatcher thread")
}

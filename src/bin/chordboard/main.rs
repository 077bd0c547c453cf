//! chordboard - play the button instrument from a terminal
//!
//! Run with: cargo run
//!
//! Keys stand in for the board's buttons: A-G play notes, 3-6 select the
//! octave, S is sharp (held), H toggles chord mode, M toggles major/minor.

mod app;
mod keymap;
mod ui;

use std::fs::File;

use app::Chordboard;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use env_logger::{Env, Target};

/// The TUI owns the terminal, so log lines go to a file instead
const LOG_FILE: &str = "chordboard.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    Chordboard::new().run()
}

fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

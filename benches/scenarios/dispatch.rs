//! Benchmarks for note dispatch through the instrument.
//!
//! Chord waits are skipped so only synthesis and bookkeeping are measured.

use std::hint::black_box;
use std::time::Duration;

use chordboard::{
    dsp::WaveformBuffer,
    synth::{InputEvent, Instrument, VoicePlayer},
    theory::Letter,
};
use criterion::Criterion;

fn instrument() -> Instrument<Vec<WaveformBuffer>, fn(Duration)> {
    fn no_wait(_: Duration) {}
    let recorder: Vec<WaveformBuffer> = Vec::new();
    Instrument::new(VoicePlayer::new(recorder).with_pacer(no_wait as fn(Duration)))
}

pub fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/dispatch");

    let single = instrument();
    single.handle(InputEvent::SharpPressed).unwrap();
    group.bench_function("single_note", |b| {
        b.iter(|| {
            single
                .handle(black_box(InputEvent::NotePressed(Letter::F)))
                .unwrap();
            single.with_player(|player| player.output_mut().clear());
        })
    });

    let chord = instrument();
    chord.handle(InputEvent::ChordTogglePressed).unwrap();
    chord.handle(InputEvent::MinorMajorTogglePressed).unwrap();
    group.bench_function("minor_chord", |b| {
        b.iter(|| {
            chord
                .handle(black_box(InputEvent::NotePressed(Letter::A)))
                .unwrap();
            chord.with_player(|player| player.output_mut().clear());
        })
    });

    group.finish();
}

//! Benchmarks for the full render loop.
//!
//! A held note through the whole chain: atomic control loads, routing, voice
//! and delay, for each callback size.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use siren_dsp::{
    dsp::modulate::{Mod1Target, Mod2Target},
    synth::message::NoteEvent,
    EngineConfig, SirenEngine,
};

use crate::BLOCK_SIZES;

fn held_note(mod1: Mod1Target, mod2: Mod2Target) -> Option<SirenEngine> {
    let mut engine = SirenEngine::new(EngineConfig::new(48_000.0)).ok()?;
    engine.controls().set_mod1_target(mod1);
    engine.controls().set_mod2_target(mod2);

    let mut warmup = vec![0.0f32; 4_800];
    engine.render_block(&mut warmup, &[NoteEvent::on(0, 57, 1.0)]);
    Some(engine)
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    let routings = [
        ("dry_siren", Mod1Target::None, Mod2Target::None),
        ("wail", Mod1Target::CarrierRate, Mod2Target::None),
        ("tape_wobble", Mod1Target::DelayTime, Mod2Target::DelayWetDry),
        ("cascade", Mod1Target::CarrierRate, Mod2Target::Mod1Rate),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for &(name, mod1, mod2) in &routings {
            let Some(mut engine) = held_note(mod1, mod2) else {
                return;
            };
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    engine.render_block(black_box(&mut buffer), &[]);
                })
            });
        }

        // Retriggering every block exercises the event path
        let Some(mut engine) = held_note(Mod1Target::CarrierRate, Mod2Target::None) else {
            return;
        };
        let events = [NoteEvent::on(0, 60, 1.0), NoteEvent::on(size / 2, 67, 0.8)];
        group.bench_with_input(BenchmarkId::new("retrigger", size), &size, |b, _| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer), black_box(&events));
            })
        });
    }

    group.finish();
}

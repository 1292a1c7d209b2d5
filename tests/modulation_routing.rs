use siren_dsp::{
    dsp::{
        lfo::{Lfo, PRIMARY_RATE_RANGE},
        modulate::{route, Mod1Target, Mod2Target, RouteInputs},
    },
    engine::controls::{ControlId, Controls},
    synth::message::NoteEvent,
    EngineConfig, SirenEngine,
};
use std::sync::Arc;

const SAMPLE_RATE: f32 = 44_100.0;

fn engine_with(mod1: Mod1Target, mod2: Mod2Target) -> SirenEngine {
    let controls = Arc::new(Controls::new());
    controls.set_mod1_target(mod1);
    controls.set_mod2_target(mod2);
    SirenEngine::with_controls(EngineConfig::new(SAMPLE_RATE).with_noise_seed(17), controls).unwrap()
}

/// Render one sample at a time, recording the carrier frequency after each.
fn carrier_track(engine: &mut SirenEngine, samples: usize) -> Vec<f32> {
    let mut one = [0.0f32];
    (0..samples)
        .map(|_| {
            engine.render_block(&mut one, &[]);
            engine.carrier_frequency()
        })
        .collect()
}

#[test]
fn unrouted_sources_leave_every_parameter_exact() {
    let inputs = RouteInputs {
        carrier_rate: 317.0,
        delay_time: 0.42,
        delay_feedback: 0.33,
        delay_wet_dry: 0.61,
        mod1_rate: 13.0,
        mod1_amount: 1.0,
        mod1_target: Mod1Target::None,
        mod2_rate: 29.0,
        mod2_amount: 1.0,
        mod2_target: Mod2Target::None,
    };
    let mut mod1 = Lfo::primary(SAMPLE_RATE);
    let mut mod2 = Lfo::secondary(SAMPLE_RATE);

    for _ in 0..10_000 {
        let routed = route(&inputs, &mut mod1, &mut mod2);
        assert_eq!(routed.carrier_rate, inputs.carrier_rate);
        assert_eq!(routed.delay_time, inputs.delay_time);
        assert_eq!(routed.delay_feedback, inputs.delay_feedback);
        assert_eq!(routed.delay_wet_dry, inputs.delay_wet_dry);
        assert_eq!(routed.mod1_rate, inputs.mod1_rate);
        assert_eq!(routed.mod1_amount, inputs.mod1_amount);
    }
}

#[test]
fn unrouted_pitch_is_the_note_frequency() {
    let mut engine = engine_with(Mod1Target::None, Mod2Target::None);
    let mut out = vec![0.0f32; 16];
    engine.render_block(&mut out, &[NoteEvent::on(0, 69, 1.0)]);

    let track = carrier_track(&mut engine, 5_000);
    assert!(track.iter().all(|&f| f == track[0]));
    assert!((track[0] - 440.0).abs() < 1e-3);
}

#[test]
fn carrier_routing_sweeps_pitch() {
    let mut engine = engine_with(Mod1Target::CarrierRate, Mod2Target::None);
    engine.controls().set(ControlId::Mod1Rate, 4.0);
    engine.controls().set(ControlId::Mod1Amount, 0.5);

    let mut out = vec![0.0f32; 16];
    engine.render_block(&mut out, &[NoteEvent::on(0, 69, 1.0)]);
    let track = carrier_track(&mut engine, SAMPLE_RATE as usize / 2);

    let lowest = track.iter().copied().fold(f32::MAX, f32::min);
    let highest = track.iter().copied().fold(f32::MIN, f32::max);

    // 440 × (1 ± 0.5 × 4), held to [20, 2000] before the ratio is applied.
    assert!(lowest < 60.0, "lowest {lowest}");
    assert!(highest > 1_250.0 && highest <= 1_320.5, "highest {highest}");
}

#[test]
fn carrier_routing_scales_other_notes_by_the_same_ratio() {
    let mut a = engine_with(Mod1Target::CarrierRate, Mod2Target::None);
    let mut b = engine_with(Mod1Target::CarrierRate, Mod2Target::None);
    let mut out = vec![0.0f32; 8];
    a.render_block(&mut out, &[NoteEvent::on(0, 57, 1.0)]);
    b.render_block(&mut out, &[NoteEvent::on(0, 69, 1.0)]);

    let low = carrier_track(&mut a, 2_000);
    let high = carrier_track(&mut b, 2_000);
    for (l, h) in low.iter().zip(&high) {
        // Siren clamps at 20 Hz, so compare only where neither is clamped.
        if *l > 20.0 && *h > 20.0 {
            assert!((h / l - 2.0).abs() < 1e-3, "{h} / {l}");
        }
    }
}

#[test]
fn secondary_drives_primary_rate_within_range() {
    let inputs = RouteInputs {
        carrier_rate: 440.0,
        delay_time: 0.375,
        delay_feedback: 0.6,
        delay_wet_dry: 0.4,
        mod1_rate: 10.0,
        mod1_amount: 0.5,
        mod1_target: Mod1Target::CarrierRate,
        mod2_rate: 5.0,
        mod2_amount: 1.0,
        mod2_target: Mod2Target::Mod1Rate,
    };
    let mut mod1 = Lfo::primary(SAMPLE_RATE);
    let mut mod2 = Lfo::secondary(SAMPLE_RATE);

    let rates: Vec<f32> = (0..SAMPLE_RATE as usize)
        .map(|_| route(&inputs, &mut mod1, &mut mod2).mod1_rate)
        .collect();

    assert!(rates.iter().all(|r| PRIMARY_RATE_RANGE.contains(r)));
    let lowest = rates.iter().copied().fold(f32::MAX, f32::min);
    let highest = rates.iter().copied().fold(f32::MIN, f32::max);
    // 10 × (1 ± 3): bottoms out at the range floor, peaks near 40 Hz.
    assert_eq!(lowest, *PRIMARY_RATE_RANGE.start());
    assert!(highest > 39.0 && highest <= 40.0, "highest {highest}");
}

#[test]
fn delay_time_routing_leaves_the_dry_signal_alone() {
    let mut plain = engine_with(Mod1Target::None, Mod2Target::None);
    let mut wobbly = engine_with(Mod1Target::DelayTime, Mod2Target::None);

    let events = [NoteEvent::on(0, 60, 1.0)];
    let mut out_plain = vec![0.0f32; 30_000];
    let mut out_wobbly = vec![0.0f32; 30_000];
    plain.render_block(&mut out_plain, &events);
    wobbly.render_block(&mut out_wobbly, &events);

    // Shortest possible echo is 0.375 × 0.75 s away.
    let first_echo = (0.375 * 0.75 * SAMPLE_RATE) as usize;
    assert_eq!(out_plain[..first_echo - 10], out_wobbly[..first_echo - 10]);
    assert_ne!(out_plain[first_echo..], out_wobbly[first_echo..]);
}

#[test]
fn wet_dry_routing_acts_within_the_same_sample() {
    let mut plain = engine_with(Mod1Target::None, Mod2Target::None);
    let mut moving = engine_with(Mod1Target::None, Mod2Target::DelayWetDry);

    let events = [NoteEvent::on(0, 60, 1.0)];
    let mut out_plain = vec![0.0f32; 64];
    let mut out_moving = vec![0.0f32; 64];
    plain.render_block(&mut out_plain, &events);
    moving.render_block(&mut out_moving, &events);

    // LFO2 starts at phase zero, so the first sample matches; it moves from the second on.
    assert_eq!(out_plain[0], out_moving[0]);
    assert_ne!(out_plain[1], out_moving[1]);
}

#[test]
fn control_changes_land_on_the_next_sample() {
    let mut engine = engine_with(Mod1Target::None, Mod2Target::None);
    let mut out = vec![0.0f32; 16];
    engine.render_block(&mut out, &[NoteEvent::on(0, 69, 1.0)]);

    engine.controls().set(ControlId::DelayWetDry, 0.0);
    engine.controls().set(ControlId::CarrierLevel, 0.0);
    let mut one = [1.0f32];
    engine.render_block(&mut one, &[]);
    assert_eq!(one[0], 0.0);
}

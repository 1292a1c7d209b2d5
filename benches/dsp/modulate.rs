//! Benchmarks for the two-stage modulation router.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use siren_dsp::dsp::{
    lfo::Lfo,
    modulate::{route, Mod1Target, Mod2Target, RouteInputs},
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn inputs(mod1_target: Mod1Target, mod2_target: Mod2Target) -> RouteInputs {
    RouteInputs {
        carrier_rate: 440.0,
        delay_time: 0.375,
        delay_feedback: 0.6,
        delay_wet_dry: 0.4,
        mod1_rate: 2.0,
        mod1_amount: 0.5,
        mod1_target,
        mod2_rate: 0.5,
        mod2_amount: 0.3,
        mod2_target,
    }
}

pub fn bench_modulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/modulate");

    let cases = [
        ("unrouted", inputs(Mod1Target::None, Mod2Target::None)),
        ("carrier", inputs(Mod1Target::CarrierRate, Mod2Target::None)),
        ("cascade", inputs(Mod1Target::CarrierRate, Mod2Target::Mod1Rate)),
    ];

    for &size in BLOCK_SIZES {
        for (name, inputs) in &cases {
            let mut mod1 = Lfo::primary(SAMPLE_RATE);
            let mut mod2 = Lfo::secondary(SAMPLE_RATE);
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += route(black_box(inputs), &mut mod1, &mut mod2).carrier_rate;
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}

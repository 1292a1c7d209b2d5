//! Benchmarks for the band-limited oscillator and the siren oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use siren_dsp::dsp::{oscillator::OscillatorBlock, siren::SirenOscillator};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - plain sin() per sample
        let mut osc = OscillatorBlock::sine(SAMPLE_RATE);
        osc.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Sawtooth - one PolyBLEP correction
        let mut osc = OscillatorBlock::sawtooth(SAMPLE_RATE);
        osc.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sawtooth", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Square - two PolyBLEP corrections
        let mut osc = OscillatorBlock::square(SAMPLE_RATE);
        osc.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Siren - drift sine plus an RNG draw per sample
        let mut siren = SirenOscillator::new(SAMPLE_RATE, 1);
        siren.set_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("siren", size), &size, |b, _| {
            b.iter(|| {
                siren.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

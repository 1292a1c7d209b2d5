//! Benchmarks for the feedback delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use siren_dsp::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in seconds
    let delay_times: &[f32] = &[0.01, 0.1, 1.0];

    for &size in BLOCK_SIZES {
        // Generate a test signal
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &seconds in delay_times {
            let Ok(mut delay) = DelayLine::new(SAMPLE_RATE, 2.0) else {
                return;
            };
            delay.set_delay_time(seconds);
            delay.set_feedback(0.6);
            delay.set_wet_dry(0.4);

            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{}ms", (seconds * 1000.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Per-sample parameter updates, as the engine drives it under modulation
        let Ok(mut delay) = DelayLine::new(SAMPLE_RATE, 2.0) else {
            return;
        };
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    delay.set_delay_time(0.375 + (i as f32 * 0.01).sin() * 0.1);
                    delay.set_feedback(0.6);
                    delay.set_wet_dry(0.4);
                    *sample = delay.next_sample(black_box(input[i]));
                }
            })
        });
    }

    group.finish();
}

//! The gritty square wave at the heart of the dub siren.

/*
Siren Oscillator
================

A deliberately rough square wave. It differs from `OscillatorBlock` in three
ways:

  drift       A very slow secondary phase perturbs the main phase before the
              0.5 threshold is applied, so the pitch wanders a hair, like an
              old transistor oscillator warming up.

                  drift  = sin(2π · drift_phase) · DRIFT_DEPTH
                  output = phase + drift < 0.5 ? +1 : -1

  noise       A tiny uniform noise floor is added to every sample.

  no BLEP     The hard edges are left in. The aliasing is part of the sound.

Both the square and its noise are scaled by `level` (base level × velocity).

The noise comes from a seeded `StdRng` owned by the oscillator, so two
oscillators built with the same seed produce identical output.
*/

use std::f32::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::math::{wrap_phase, MAX_FREQUENCY, MIN_FREQUENCY};

/// Peak phase offset contributed by drift, in cycles.
pub const DRIFT_DEPTH: f32 = 0.002;
/// How fast the drift wanders, in Hz.
pub const DRIFT_RATE_HZ: f32 = 0.7;
/// Peak-to-peak width of the additive noise floor.
pub const NOISE_WIDTH: f32 = 0.01;

pub struct SirenOscillator {
    sample_rate: f32,
    frequency: f32,
    level: f32,
    phase: f32,
    increment: f32,
    drift_phase: f32,
    drift_increment: f32,
    rng: StdRng,
}

impl SirenOscillator {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        let mut osc = Self {
            sample_rate,
            frequency: 440.0,
            level: 0.8,
            phase: 0.0,
            increment: 0.0,
            drift_phase: 0.0,
            drift_increment: DRIFT_RATE_HZ / sample_rate,
            rng: StdRng::seed_from_u64(seed),
        };
        osc.set_frequency(440.0);
        osc
    }

    /// Set frequency in Hz, clamped to `[20, 20000]` regardless of sample rate.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY);
        self.increment = self.frequency / self.sample_rate;
    }

    /// Output level, clamped to `[0, 1]`.
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.drift_phase = 0.0;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.drift_phase = wrap_phase(self.drift_phase + self.drift_increment);
        let drift = (TAU * self.drift_phase).sin() * DRIFT_DEPTH;

        let square = if wrap_phase(self.phase + drift) < 0.5 {
            1.0
        } else {
            -1.0
        };
        let noise = (self.rng.gen::<f32>() - 0.5) * NOISE_WIDTH;

        self.phase = wrap_phase(self.phase + self.increment);
        (square + noise) * self.level
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

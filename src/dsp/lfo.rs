//! Low Frequency Oscillator (LFO) used as a modulation source.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio (or barely audio) rates whose
output moves a parameter instead of being heard directly.

Vocabulary
----------

  rate        Cycles per second of the LFO, in Hz.

  amount      Depth, 0.0 to 1.0. The router multiplies the raw bipolar
              output by this before applying it to a target.

  bipolar     Output swings positive AND negative: -1.0 to +1.0. Every LFO
              here is bipolar, so a target moves above and below its base.

  free-running  The phase is never reset by notes. Each note catches the
              modulation wherever it happens to be.


Two Flavors
-----------

The siren carries two LFOs with different jobs:

    primary     0.01 - 80 Hz   moves the sound (pitch, delay time, feedback)
    secondary   0.1  - 80 Hz   moves the primary LFO (or the delay mix)

The primary needs the very slow end for long, sweeping siren wails; the
secondary lives a little faster because it shapes another modulator.


Reading Without Advancing
-------------------------

`next_sample()` returns sin(2π·phase) and then advances the phase.
`modulation_value()` returns the same instantaneous value scaled by amount
without touching the phase, so meters and tests can look at an LFO without
stealing a step from the render loop.
*/

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use super::math::{clamp, wrap_phase};

/// Rate range for the primary modulation source.
pub const PRIMARY_RATE_RANGE: RangeInclusive<f32> = 0.01..=80.0;
/// Rate range for the secondary modulation source.
pub const SECONDARY_RATE_RANGE: RangeInclusive<f32> = 0.1..=80.0;

pub struct Lfo {
    sample_rate: f32,
    rate: f32,
    amount: f32,
    phase: f32,
    increment: f32,
    min_rate: f32,
    max_rate: f32,
}

impl Lfo {
    pub fn new(sample_rate: f32, rate_range: RangeInclusive<f32>) -> Self {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        let (min_rate, max_rate) = rate_range.into_inner();
        let mut lfo = Self {
            sample_rate,
            rate: 1.0,
            amount: 0.5,
            phase: 0.0,
            increment: 0.0,
            min_rate,
            max_rate,
        };
        lfo.set_rate(1.0);
        lfo
    }

    pub fn primary(sample_rate: f32) -> Self {
        Self::new(sample_rate, PRIMARY_RATE_RANGE)
    }

    pub fn secondary(sample_rate: f32) -> Self {
        Self::new(sample_rate, SECONDARY_RATE_RANGE)
    }

    /// Set rate in Hz, clamped to this LFO's range.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = clamp(rate, self.min_rate, self.max_rate);
        self.increment = self.rate / self.sample_rate;
    }

    /// Set depth, clamped to `[0, 1]`.
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount.clamp(0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn rate_range(&self) -> RangeInclusive<f32> {
        self.min_rate..=self.max_rate
    }

    /// Bipolar output for the current phase, then advance one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase = wrap_phase(self.phase + self.increment);
        value
    }

    /// Current output scaled by amount. Does not advance.
    #[inline]
    pub fn modulation_value(&self) -> f32 {
        (TAU * self.phase).sin() * self.amount
    }
}

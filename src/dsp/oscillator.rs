//! Band-limited audio oscillator.

/*
Band-Limited Oscillator
=======================

Vocabulary
----------

  phase       Where we are inside one cycle, normalized to [0, 1).

  increment   How far phase moves per sample: frequency / sample_rate.
              A 441 Hz tone at 44.1 kHz moves 0.01 of a cycle per sample.

  Nyquist     Half the sample rate. Anything above it folds back down as
              aliasing, so frequencies are clamped below it.


Why Saw and Square Alias
------------------------

A naive sawtooth jumps from +1 to -1 in a single sample. That instantaneous
step has energy at every frequency, far above Nyquist, and all of it folds
back into the audible band as inharmonic fizz.

    naive saw        ╱│╱│╱│          band-limited saw    ╱╲╱╲╱╲
                    ╱ │╱ │╱ │  →                        ╱ ╲╱ ╲╱ ╲
                                                     (corners rounded)


PolyBLEP
--------

PolyBLEP (polynomial band-limited step) subtracts a small quadratic
correction in the one-sample window on either side of a discontinuity.
With dt = increment and t = phase:

    t < dt          (just after the jump)   x = t / dt;        2x - x² - 1
    t > 1 - dt      (just before the jump)  x = (t - 1) / dt;  x² + 2x + 1
    otherwise                               0

Saw has one discontinuity (phase 0). Square has two (phase 0 rising,
phase 0.5 falling), so the correction is applied twice, the second time on
the phase shifted by half a cycle.

Sine has no discontinuity and needs no correction.
*/

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::math::{clamp, wrap_phase, MAX_FREQUENCY, MIN_FREQUENCY};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
}

pub struct OscillatorBlock {
    sample_rate: f32,
    frequency: f32,
    phase: f32,
    increment: f32,
    waveform: OscillatorWaveform,
}

impl OscillatorBlock {
    pub fn new(sample_rate: f32, waveform: OscillatorWaveform) -> Self {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        let mut osc = Self {
            sample_rate,
            frequency: 440.0,
            phase: 0.0,
            increment: 0.0,
            waveform,
        };
        osc.set_frequency(440.0);
        osc
    }

    pub fn sine(sample_rate: f32) -> Self {
        Self::new(sample_rate, OscillatorWaveform::Sine)
    }

    pub fn sawtooth(sample_rate: f32) -> Self {
        Self::new(sample_rate, OscillatorWaveform::Saw)
    }

    pub fn square(sample_rate: f32) -> Self {
        Self::new(sample_rate, OscillatorWaveform::Square)
    }

    /// Set frequency in Hz, clamped to `[20, min(20000, Nyquist)]`.
    pub fn set_frequency(&mut self, frequency: f32) {
        let ceiling = MAX_FREQUENCY.min(self.sample_rate * 0.5);
        self.frequency = clamp(frequency, MIN_FREQUENCY, ceiling);
        self.increment = self.frequency / self.sample_rate;
    }

    pub fn set_waveform(&mut self, waveform: OscillatorWaveform) {
        self.waveform = waveform;
    }

    /// Restart the cycle at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let phase = self.phase;
        let sample = match self.waveform {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Saw => (2.0 * phase - 1.0) - self.poly_blep(phase),
            OscillatorWaveform::Square => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                naive + self.poly_blep(phase) - self.poly_blep(wrap_phase(phase + 0.5))
            }
        };

        self.phase = wrap_phase(phase + self.increment);
        sample
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Quadratic step residual, non-zero only within one increment of a jump.
    #[inline]
    fn poly_blep(&self, t: f32) -> f32 {
        let dt = self.increment;
        if t < dt {
            let x = t / dt;
            x + x - x * x - 1.0
        } else if t > 1.0 - dt {
            let x = (t - 1.0) / dt;
            x * x + x + x + 1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn zero_crossings(buffer: &[f32]) -> usize {
        buffer
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count()
    }

    #[test]
    fn sine_matches_closed_form() {
        let mut osc = OscillatorBlock::sine(48_000.0);
        osc.set_frequency(440.0);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer);

        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / 48_000.0).sin();
        assert!((buffer[n] - expected).abs() < 1e-4, "expected {expected}, got {}", buffer[n]);
    }

    #[test]
    fn sine_440_crosses_zero_about_880_times_per_second() {
        let mut osc = OscillatorBlock::sine(SAMPLE_RATE);
        osc.set_frequency(440.0);

        let mut buffer = vec![0.0f32; SAMPLE_RATE as usize];
        osc.render(&mut buffer);

        let crossings = zero_crossings(&buffer) as f32;
        assert!(
            (crossings - 880.0).abs() <= 880.0 * 0.05,
            "got {crossings} zero crossings"
        );
    }

    #[test]
    fn frequency_is_clamped_to_audible_range_and_nyquist() {
        let mut osc = OscillatorBlock::sawtooth(SAMPLE_RATE);

        osc.set_frequency(1.0);
        assert_eq!(osc.frequency(), 20.0);

        osc.set_frequency(50_000.0);
        assert_eq!(osc.frequency(), 20_000.0);

        let mut low_rate = OscillatorBlock::square(8_000.0);
        low_rate.set_frequency(10_000.0);
        assert_eq!(low_rate.frequency(), 4_000.0);
    }

    #[test]
    fn setting_the_same_frequency_twice_is_idempotent() {
        let mut osc = OscillatorBlock::sine(SAMPLE_RATE);
        osc.set_frequency(1234.5);
        let first = osc.frequency();
        osc.set_frequency(first);
        assert_eq!(osc.frequency(), first);
    }

    #[test]
    fn phase_stays_in_unit_interval() {
        for waveform in [
            OscillatorWaveform::Sine,
            OscillatorWaveform::Saw,
            OscillatorWaveform::Square,
        ] {
            let mut osc = OscillatorBlock::new(SAMPLE_RATE, waveform);
            osc.set_frequency(19_999.0);
            for _ in 0..10_000 {
                osc.next_sample();
                assert!((0.0..1.0).contains(&osc.phase()));
            }
        }
    }

    #[test]
    fn saw_and_square_stay_roughly_bounded() {
        for waveform in [OscillatorWaveform::Saw, OscillatorWaveform::Square] {
            let mut osc = OscillatorBlock::new(SAMPLE_RATE, waveform);
            osc.set_frequency(3_000.0);
            let mut buffer = vec![0.0f32; 4096];
            osc.render(&mut buffer);
            for &s in &buffer {
                assert!(s.abs() <= 1.1, "{waveform:?} sample {s} out of range");
            }
        }
    }

    #[test]
    fn saw_wraparound_is_smoothed() {
        // Without correction the saw jumps by ~2.0 at the wrap. PolyBLEP
        // splits that jump across the samples on either side.
        let mut osc = OscillatorBlock::sawtooth(SAMPLE_RATE);
        osc.set_frequency(1_000.0);
        let mut buffer = vec![0.0f32; 2048];
        osc.render(&mut buffer);

        let largest_step = buffer
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0f32, f32::max);
        assert!(largest_step < 1.9, "largest step {largest_step}");
    }

    #[test]
    fn square_has_both_polarities_and_reset_restarts_cycle() {
        let mut osc = OscillatorBlock::square(SAMPLE_RATE);
        osc.set_frequency(100.0);
        let mut buffer = vec![0.0f32; 441];
        osc.render(&mut buffer);
        assert!(buffer.iter().any(|&s| s > 0.9));
        assert!(buffer.iter().any(|&s| s < -0.9));

        osc.reset();
        assert_eq!(osc.phase(), 0.0);
        osc.set_waveform(OscillatorWaveform::Sine);
        assert_eq!(osc.waveform(), OscillatorWaveform::Sine);
        assert_eq!(osc.next_sample(), 0.0);
    }
}

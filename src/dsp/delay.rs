//! Feedback delay line with analog-style time wobble.

/*
Dub Delay
=========

A circular buffer of past samples. Each tick we read a sample from
`delay_time` seconds ago, mix it with the input, and write the input plus a
share of that delayed sample back in, so echoes repeat and fade.

Vocabulary
----------

  write index   Where the next input lands. Advances by one each sample and
                wraps at the end of the buffer.

  offset        How many samples behind the write index we read.

  feedback      Share of the delayed signal written back. Each echo is
                `feedback` times the one before. Capped at 0.95 so the loop
                always loses energy.

  wet / dry     Output mix: dry · input + wet · delayed, with dry = 1 - wet.

  wobble        A slow sine that stretches and squeezes the delay time by a
                tiny fraction, like tape or a bucket-brigade chip drifting.


Per-Sample Algorithm
--------------------

    wobble_phase += WOBBLE_RATE_HZ / sample_rate
    time   = clamp(delay_time · (1 + sin(2π·wobble_phase) · WOBBLE_DEPTH))
    offset = min(time · sample_rate, len - 1)
    read   = (write + len - offset) mod len

    delayed       = buffer[read]              ← read first
    buffer[write] = input + feedback · delayed
    write         = (write + 1) mod len
    output        = dry · input + wet · delayed

Reading before writing, at a slot `offset` behind the write head, is what
closes the feedback loop without ever reading the sample we just wrote.


Capacity
--------

The buffer is allocated once, at construction, to `sample_rate ×
max_delay_seconds` samples and never resized. Offsets are capped at len - 1,
so a delay time longer than the buffer just reads the oldest sample.
*/

use std::f32::consts::TAU;

use crate::error::{check_sample_rate, EngineError};

use super::math::{lerp, wrap_phase};

pub const MIN_DELAY_SECONDS: f32 = 0.001;
pub const MAX_DELAY_SECONDS: f32 = 2.0;
pub const MAX_FEEDBACK: f32 = 0.95;

/// Relative depth of the delay-time wobble.
pub const WOBBLE_DEPTH: f32 = 0.0005;
/// Rate of the delay-time wobble in Hz.
pub const WOBBLE_RATE_HZ: f32 = 0.5;

pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    sample_rate: f32,

    delay_time: f32,
    feedback: f32,
    wet_dry: f32,

    wobble_phase: f32,
    wobble_increment: f32,
}

impl DelayLine {
    pub fn new(sample_rate: f32, max_delay_seconds: f32) -> Result<Self, EngineError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if !(max_delay_seconds.is_finite() && max_delay_seconds > 0.0) {
            return Err(EngineError::InvalidMaxDelay(max_delay_seconds));
        }

        // Always keep at least two slots so `len - 1` is a usable offset.
        let capacity = ((sample_rate * max_delay_seconds) as usize).max(2);

        Ok(Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
            sample_rate,
            delay_time: 0.25,
            feedback: 0.5,
            wet_dry: 0.3,
            wobble_phase: 0.0,
            wobble_increment: WOBBLE_RATE_HZ / sample_rate,
        })
    }

    /// Delay time in seconds, clamped to `[0.001, 2.0]`.
    pub fn set_delay_time(&mut self, seconds: f32) {
        self.delay_time = seconds.clamp(MIN_DELAY_SECONDS, MAX_DELAY_SECONDS);
    }

    /// Feedback, clamped to `[0, 0.95]`.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    /// Wet/dry mix, clamped to `[0, 1]`. 0 is fully dry.
    pub fn set_wet_dry(&mut self, wet_dry: f32) {
        self.wet_dry = wet_dry.clamp(0.0, 1.0);
    }

    pub fn delay_time(&self) -> f32 {
        self.delay_time
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn wet_dry(&self) -> f32 {
        self.wet_dry
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();

        self.wobble_phase = wrap_phase(self.wobble_phase + self.wobble_increment);
        let wobble = (self.wobble_phase * TAU).sin() * WOBBLE_DEPTH;
        let time = (self.delay_time * (1.0 + wobble)).clamp(MIN_DELAY_SECONDS, MAX_DELAY_SECONDS);

        let offset = ((time * self.sample_rate) as usize).min(len - 1);
        let read_pos = (self.write_pos + len - offset) % len;

        let delayed = self.buffer[read_pos];
        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % len;

        lerp(input, delayed, self.wet_dry)
    }

    /// Process a buffer in place with the current settings.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    /// Zero the buffer and rewind the write head and wobble.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
        self.wobble_phase = 0.0;
    }
}

//! Small numeric helpers shared by every DSP block.

/// Lowest frequency any audio-rate oscillator will run at.
pub const MIN_FREQUENCY: f32 = 20.0;
/// Highest frequency any audio-rate oscillator will run at.
pub const MAX_FREQUENCY: f32 = 20_000.0;

/// Magnitudes below this are flushed to exactly zero.
pub const DENORMAL_THRESHOLD: f32 = 1e-15;

/// MIDI note number of A4.
pub const MIDI_A4: u8 = 69;
/// Concert pitch for A4 in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// Convert MIDI note number to frequency in Hz.
///
/// Equal temperament: `f = 440 * 2^((n - 69) / 12)`
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((note as f32 - MIDI_A4 as f32) / 12.0)
}

/// Clamp that never panics, even when `min > max` (the lower bound wins).
///
/// `f32::clamp` asserts `min <= max`; a couple of our upper bounds derive from
/// the sample rate, so we cannot rule that out statically.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Flush values too small to matter to zero so they never become subnormal.
#[inline]
pub fn flush_denormal(value: f32) -> f32 {
    if value.abs() < DENORMAL_THRESHOLD {
        0.0
    } else {
        value
    }
}

/// Wrap a phase into `[0, 1)`.
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase - phase.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Convert milliseconds to a whole number of samples (rounded).
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> u32 {
    (ms * sample_rate / 1000.0).round().max(0.0) as u32
}

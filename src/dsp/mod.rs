//! Low-level DSP primitives used by the voice and the engine.
//!
//! These components are allocation-free after construction and realtime-safe,
//! making them safe to embed directly inside the render loop. They stay focused
//! on the signal-processing math; note handling and parameter plumbing live in
//! `synth` and `engine`.

/// Circular-buffer feedback delay with wobble.
pub mod delay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Sine-only low frequency oscillators used as modulation sources.
pub mod lfo;
/// Pitch conversion, phase wrapping and denormal helpers.
pub mod math;
/// Two-stage modulation router.
pub mod modulate;
/// Band-limited sine/saw/square oscillator.
pub mod oscillator;
/// Gritty square-wave siren oscillator.
pub mod siren;

pub use envelope::EnvelopeState;

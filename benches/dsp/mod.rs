//! Benchmarks for low-level DSP primitives.

mod delay;
mod envelope;
mod modulate;
mod oscillator;

pub use delay::bench_delay;
pub use envelope::bench_envelope;
pub use modulate::bench_modulate;
pub use oscillator::bench_oscillator;

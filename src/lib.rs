pub mod dsp; // Oscillators, envelope, LFOs, delay, routing
pub mod engine; // Render loop and shared controls
pub mod error;
pub mod patch; // Serializable control presets
pub mod synth; // Note events and the siren voice

pub use engine::{controls::Controls, EngineConfig, SirenEngine};
pub use error::EngineError;

/// Largest chunk the engine renders in one pass. Longer blocks are split.
pub const MAX_BLOCK_SIZE: usize = 2048;
/// Note events taken from a queue per block by `SirenEngine::render_from`.
pub const MAX_PENDING_EVENTS: usize = 256;

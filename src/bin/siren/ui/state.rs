//! Shared state types for UI communication
//!
//! Everything that crosses into or out of the audio callback is `Copy`, so
//! pushing it through a ring buffer never allocates.

use siren_dsp::{dsp::EnvelopeState, SirenEngine};

/// Commands sent from the UI thread to the audio thread
#[derive(Clone, Copy, Debug)]
pub enum EngineCommand {
    /// Silence everything and clear the delay
    Reset,
    /// Release the sounding note
    AllNotesOff,
}

/// Voice state published by the audio thread after every callback
#[derive(Clone, Copy, Debug)]
pub struct VoiceStatus {
    pub envelope_level: f32,
    pub stage: EnvelopeState,
    pub note: Option<u8>,
    /// Siren frequency after modulation (Hz)
    pub carrier_hz: f32,
    /// LFO outputs scaled by their amounts
    pub mod1: f32,
    pub mod2: f32,
}

impl VoiceStatus {
    pub fn capture(engine: &SirenEngine) -> Self {
        let (mod1, mod2) = engine.modulation_values();
        Self {
            envelope_level: engine.envelope_level(),
            stage: engine.envelope_stage(),
            note: engine.current_note(),
            carrier_hz: engine.carrier_frequency(),
            mod1,
            mod2,
        }
    }
}

impl Default for VoiceStatus {
    fn default() -> Self {
        Self {
            envelope_level: 0.0,
            stage: EnvelopeState::Idle,
            note: None,
            carrier_hz: 0.0,
            mod1: 0.0,
            mod2: 0.0,
        }
    }
}

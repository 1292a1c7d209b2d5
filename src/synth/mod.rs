// Purpose: note events and the monophonic siren voice
// This layer sits between the DSP primitives and the engine's render loop

pub mod message;
pub mod voice;

use crate::dsp::{
    envelope::{Envelope, EnvelopeState},
    math::midi_note_to_freq,
    siren::SirenOscillator,
};

/// The single siren voice: one oscillator gated by one envelope.
///
/// Monophonic with last-note priority. A new note always takes over; a
/// note-off only releases the gate if it names the note currently sounding.
pub struct Voice {
    siren: SirenOscillator,
    envelope: Envelope,
    note: Option<u8>,
    velocity: f32,
    note_frequency: f32,
}

impl Voice {
    pub fn new(siren: SirenOscillator, envelope: Envelope) -> Self {
        Self {
            siren,
            envelope,
            note: None,
            velocity: 0.0,
            note_frequency: 440.0,
        }
    }

    /// Start a note. A fresh gate restarts the siren's cycle; a retrigger
    /// while the envelope is still running keeps the phase continuous.
    pub fn start(&mut self, note: u8, velocity: f32) {
        let note = note.min(127);
        if !self.envelope.is_active() {
            self.siren.reset();
        }

        self.note = Some(note);
        self.velocity = velocity.clamp(0.0, 1.0);
        self.note_frequency = midi_note_to_freq(note);
        self.siren.set_frequency(self.note_frequency);
        self.envelope.note_on();
    }

    /// Release the gate if `note` is the one sounding.
    pub fn release(&mut self, note: u8) {
        if self.note == Some(note.min(127)) {
            self.note = None;
            self.envelope.note_off();
        }
    }

    /// Release whatever is sounding.
    pub fn release_all(&mut self) {
        self.note = None;
        self.envelope.note_off();
    }

    /// One output sample.
    ///
    /// `pitch_ratio` scales the note frequency (1.0 leaves it untouched) and
    /// `base_level` is multiplied by the note velocity to set the siren level.
    #[inline]
    pub fn next_sample(&mut self, pitch_ratio: f32, base_level: f32) -> f32 {
        self.siren.set_level(base_level * self.velocity);
        self.siren.set_frequency(self.note_frequency * pitch_ratio);

        let gain = self.envelope.next_sample();
        if gain > 0.0 {
            self.siren.next_sample() * gain
        } else {
            0.0
        }
    }

    pub fn set_envelope(&mut self, attack_ms: f32, decay_ms: f32, sustain: f32, release_ms: f32) {
        self.envelope.set_parameters(attack_ms, decay_ms, sustain, release_ms);
    }

    pub fn reset(&mut self) {
        self.siren.reset();
        self.envelope.reset();
        self.note = None;
        self.velocity = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    pub fn note(&self) -> Option<u8> {
        self.note
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn frequency(&self) -> f32 {
        self.siren.frequency()
    }

    pub fn level(&self) -> f32 {
        self.siren.level()
    }
}

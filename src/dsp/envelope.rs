use super::math::{flush_denormal, ms_to_samples};

/*
ADSR Envelope Implementation
============================

This module implements the linear ADSR envelope that gates the siren. It is
the only authority on how long a note sounds: the voice produces audio while
the envelope is active and its level is above zero.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the siren signal to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The note on/off signal. Gate high (note_on) triggers Attack.
              Gate low (note_off) triggers Release from wherever we are.

  increment   How much `level` changes per sample. Computed once when a stage
              begins, from the level at that moment and the stage length.

  counter     Samples spent in the current stage. A stage ends when the counter
              reaches its length or the level crosses its target, whichever
              comes first.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release
         (A)   (D)      (S)      (R)


Times to Samples
----------------

Times arrive in milliseconds and are converted once:

    samples = round(ms × sample_rate / 1000)

with every time floored at 0.1 ms first. Example: 10 ms at 44.1 kHz is 441
samples, so the attack increment from silence is 1/441 ≈ 0.00227.


The State Machine
-----------------

    Idle ──note_on──→ Attack ──level=1──→ Decay ──level=S──→ Sustain
     ↑                  │                   │                   │
     │                  └──────note_off─────┴──────note_off─────┤
     │                                                          ↓
     └──────────────────────level=0────────────────────────  Release
                                                                │
                      Attack ←──────────note_on─────────────────┘

Retrigger: note_on during Release (or any active stage) restarts Attack from
the CURRENT level, with the increment recomputed as

    (1 - level_at_attack_start) / attack_samples

so the level keeps climbing from where it was instead of snapping to zero.

Release snapshots the level at note_off:

    release_increment = -level / release_samples

so every release reaches exactly zero in release_samples samples no matter
which stage it started from.


Numerical Hygiene
-----------------

After every step the level is clamped to [0, 1] and anything with magnitude
below the denormal threshold is flushed to exactly zero. Idle always reads
exactly 0.0.
*/

/// Shortest allowed attack/decay/release time in milliseconds.
pub const MIN_STAGE_MS: f32 = 0.1;

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

pub struct Envelope {
    sample_rate: f32,

    sustain_level: f32,

    // Stage lengths in samples
    attack_samples: u32,
    decay_samples: u32,
    release_samples: u32,

    // Runtime state
    stage: EnvelopeState,
    level: f32,
    counter: u32,

    attack_increment: f32,
    decay_increment: f32,
    release_increment: f32,
}

impl Envelope {
    /// 10 ms attack, 100 ms decay, 0.7 sustain, 200 ms release.
    pub fn new(sample_rate: f32) -> Self {
        Self::adsr(sample_rate, 10.0, 100.0, 0.7, 200.0)
    }

    pub fn adsr(sample_rate: f32, attack_ms: f32, decay_ms: f32, sustain: f32, release_ms: f32) -> Self {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");
        let mut env = Self {
            sample_rate,
            sustain_level: 0.0,
            attack_samples: 0,
            decay_samples: 0,
            release_samples: 0,
            stage: EnvelopeState::Idle,
            level: 0.0,
            counter: 0,
            attack_increment: 0.0,
            decay_increment: 0.0,
            release_increment: 0.0,
        };
        env.set_parameters(attack_ms, decay_ms, sustain, release_ms);
        env
    }

    /// Reshape the envelope. Times are floored at 0.1 ms (NaN included),
    /// sustain clamped to [0, 1]. A NaN sustain keeps the previous level.
    ///
    /// A stage already in progress keeps its increment; only its length changes.
    pub fn set_parameters(&mut self, attack_ms: f32, decay_ms: f32, sustain: f32, release_ms: f32) {
        if !sustain.is_nan() {
            self.sustain_level = sustain.clamp(0.0, 1.0);
        }

        // f32::max returns the other operand when one side is NaN
        self.attack_samples = ms_to_samples(attack_ms.max(MIN_STAGE_MS), self.sample_rate);
        self.decay_samples = ms_to_samples(decay_ms.max(MIN_STAGE_MS), self.sample_rate);
        self.release_samples = ms_to_samples(release_ms.max(MIN_STAGE_MS), self.sample_rate);
    }

    /// Gate high: start (or restart) the attack from the current level.
    pub fn note_on(&mut self) {
        self.counter = 0;

        if self.attack_samples == 0 {
            self.level = 1.0;
            self.enter_decay();
        } else {
            self.stage = EnvelopeState::Attack;
            self.attack_increment = (1.0 - self.level) / self.attack_samples as f32;
        }
    }

    /// Gate low: release from the current level. Ignored while idle.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.stage = EnvelopeState::Release;
        self.counter = 0;
        self.release_increment = if self.release_samples > 0 {
            -self.level / self.release_samples as f32
        } else {
            -self.level
        };
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += self.attack_increment;
                self.counter += 1;

                if self.counter >= self.attack_samples || self.level >= 1.0 {
                    self.level = 1.0;
                    self.enter_decay();
                }
            }

            EnvelopeState::Decay => {
                self.level += self.decay_increment;
                self.counter += 1;

                if self.counter >= self.decay_samples || self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = EnvelopeState::Sustain;
                    self.counter = 0;
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                self.level += self.release_increment;
                self.counter += 1;

                if self.counter >= self.release_samples || self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                    self.counter = 0;
                }
            }
        }

        self.level = flush_denormal(self.level.clamp(0.0, 1.0));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    /// Force idle at level zero.
    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.counter = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn attack_samples(&self) -> u32 {
        self.attack_samples
    }

    pub fn decay_samples(&self) -> u32 {
        self.decay_samples
    }

    pub fn release_samples(&self) -> u32 {
        self.release_samples
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    fn enter_decay(&mut self) {
        self.stage = EnvelopeState::Decay;
        self.counter = 0;
        self.decay_increment = (self.sustain_level - 1.0) / self.decay_samples.max(1) as f32;
    }
}

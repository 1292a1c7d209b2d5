//! The render loop: note events and control values in, mono samples out.

/*
Render Loop
===========

For every sample of a block:

    1. fire every note event due at this index (arrival order)
    2. load all controls fresh from their atomic slots
    3. route: LFO2 → (LFO1 rate/amount, wet/dry), then LFO1 → (pitch, delay)
    4. envelope tick; if > 0, siren tick × envelope, else silence
    5. remember this sample's routed delay time/feedback/wet

Once the block is done the delay runs over it in place, picking up the
per-sample delay settings recorded in step 5. The delay only ever looks at
the voice's output, so running it after the voice gives the same result as
interleaving the two.

Blocks longer than MAX_BLOCK_SIZE are processed in MAX_BLOCK_SIZE chunks so
the scratch arrays never grow. One scheduler spans the whole block, so event
offsets are always relative to the block the caller handed in.

The render path never locks, allocates or logs.
*/

pub mod controls;
pub mod scheduler;

use std::sync::Arc;

use crate::{
    dsp::{delay::DelayLine, envelope::Envelope, lfo::Lfo, modulate::route, siren::SirenOscillator, EnvelopeState},
    error::{check_sample_rate, EngineError},
    patch::EnvelopeDescriptor,
    synth::{
        message::{MessageReceiver, NoteEvent, NoteKind},
        voice::Voice,
    },
    MAX_BLOCK_SIZE, MAX_PENDING_EVENTS,
};

use self::{controls::Controls, scheduler::Scheduler};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    pub max_delay_seconds: f32,
    /// Seed for the siren's noise floor.
    pub noise_seed: u64,
    pub envelope: EnvelopeDescriptor,
}

impl EngineConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            max_delay_seconds: 2.0,
            noise_seed: 0x5EED,
            envelope: EnvelopeDescriptor::default(),
        }
    }

    pub fn with_max_delay(mut self, seconds: f32) -> Self {
        self.max_delay_seconds = seconds;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = seed;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeDescriptor) -> Self {
        self.envelope = envelope;
        self
    }
}

pub struct SirenEngine {
    sample_rate: f32,
    controls: Arc<Controls>,

    voice: Voice,
    mod1: Lfo,
    mod2: Lfo,
    delay: DelayLine,

    // Routed delay settings for each sample of the current chunk.
    delay_times: Vec<f32>,
    delay_feedbacks: Vec<f32>,
    delay_wet_dries: Vec<f32>,

    pending: Vec<NoteEvent>,
}

impl SirenEngine {
    /// Build an engine with its own control surface, initialised to the defaults.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_controls(config, Arc::new(Controls::new()))
    }

    /// Build an engine that reads from an existing control surface.
    pub fn with_controls(config: EngineConfig, controls: Arc<Controls>) -> Result<Self, EngineError> {
        let sample_rate = check_sample_rate(config.sample_rate)?;
        let delay = DelayLine::new(sample_rate, config.max_delay_seconds)?;

        let env = config.envelope;
        let envelope = Envelope::adsr(
            sample_rate,
            env.attack_ms,
            env.decay_ms,
            env.sustain_level,
            env.release_ms,
        );
        let voice = Voice::new(SirenOscillator::new(sample_rate, config.noise_seed), envelope);

        log::debug!(
            "siren engine: {sample_rate} Hz, delay capacity {} samples",
            delay.capacity()
        );

        Ok(Self {
            sample_rate,
            controls,
            voice,
            mod1: Lfo::primary(sample_rate),
            mod2: Lfo::secondary(sample_rate),
            delay,
            delay_times: vec![0.0; MAX_BLOCK_SIZE],
            delay_feedbacks: vec![0.0; MAX_BLOCK_SIZE],
            delay_wet_dries: vec![0.0; MAX_BLOCK_SIZE],
            pending: Vec::with_capacity(MAX_PENDING_EVENTS),
        })
    }

    /// Fill `out` with the next block, firing `events` at their offsets.
    pub fn render_block(&mut self, out: &mut [f32], events: &[NoteEvent]) {
        let mut scheduler = Scheduler::new(events, out.len());

        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            self.render_chunk(chunk, chunk_index * MAX_BLOCK_SIZE, &mut scheduler);
        }

        // Only reachable with an empty block.
        while let Some(event) = scheduler.flush() {
            self.handle_event(event);
        }
    }

    /// Drain up to `MAX_PENDING_EVENTS` events from `rx` and render with them.
    /// Anything beyond that stays queued for the next block.
    pub fn render_from<R: MessageReceiver>(&mut self, out: &mut [f32], rx: &mut R) {
        let mut pending = std::mem::take(&mut self.pending);
        pending.clear();
        while pending.len() < MAX_PENDING_EVENTS {
            match rx.pop() {
                Some(event) => pending.push(event),
                None => break,
            }
        }

        self.render_block(out, &pending);
        self.pending = pending;
    }

    fn render_chunk(&mut self, out: &mut [f32], base: usize, scheduler: &mut Scheduler) {
        for (i, sample) in out.iter_mut().enumerate() {
            while let Some(event) = scheduler.due(base + i) {
                self.handle_event(event);
            }

            let values = self.controls.snapshot();
            let routed = route(&values.route_inputs(), &mut self.mod1, &mut self.mod2);

            self.delay_times[i] = routed.delay_time;
            self.delay_feedbacks[i] = routed.delay_feedback;
            self.delay_wet_dries[i] = routed.delay_wet_dry;

            let pitch_ratio = routed.carrier_rate / values.carrier_rate;
            *sample = self.voice.next_sample(pitch_ratio, values.carrier_level);
        }

        for (i, sample) in out.iter_mut().enumerate() {
            self.delay.set_delay_time(self.delay_times[i]);
            self.delay.set_feedback(self.delay_feedbacks[i]);
            self.delay.set_wet_dry(self.delay_wet_dries[i]);
            *sample = self.delay.next_sample(*sample);
        }
    }

    fn handle_event(&mut self, event: NoteEvent) {
        match event.kind {
            // A note-on with no velocity is a note-off.
            NoteKind::On if event.velocity > 0.0 => self.voice.start(event.note, event.velocity),
            NoteKind::On | NoteKind::Off => self.voice.release(event.note),
        }
    }

    /// Release whatever note is sounding. The envelope still runs its release.
    pub fn all_notes_off(&mut self) {
        self.voice.release_all();
    }

    /// Silence everything immediately: voice to Idle, delay buffer zeroed,
    /// both LFOs and the siren rewound.
    pub fn reset(&mut self) {
        log::debug!("siren engine reset");
        self.voice.reset();
        self.delay.reset();
        self.mod1.reset();
        self.mod2.reset();
    }

    /// Change the envelope shape. Takes effect from the next stage transition.
    pub fn set_envelope(&mut self, envelope: EnvelopeDescriptor) {
        self.voice.set_envelope(
            envelope.attack_ms,
            envelope.decay_ms,
            envelope.sustain_level,
            envelope.release_ms,
        );
    }

    pub fn controls(&self) -> &Arc<Controls> {
        &self.controls
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn envelope_level(&self) -> f32 {
        self.voice.envelope_level()
    }

    pub fn envelope_stage(&self) -> EnvelopeState {
        self.voice.envelope_state()
    }

    pub fn current_note(&self) -> Option<u8> {
        self.voice.note()
    }

    pub fn is_active(&self) -> bool {
        self.voice.is_active()
    }

    /// Siren frequency used for the most recent sample, after modulation.
    pub fn carrier_frequency(&self) -> f32 {
        self.voice.frequency()
    }

    /// Instantaneous LFO outputs scaled by their amounts, without advancing them.
    pub fn modulation_values(&self) -> (f32, f32) {
        (self.mod1.modulation_value(), self.mod2.modulation_value())
    }

    pub fn delay_capacity(&self) -> usize {
        self.delay.capacity()
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::modulate::{Mod1Target, Mod2Target},
    engine::controls::{ControlValues, Controls},
};

/// Everything needed to recreate a siren sound: control values plus envelope shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub name: String,
    pub description: Option<String>,
    pub carrier: CarrierDescriptor,
    pub delay: DelayDescriptor,
    pub mod1: ModulationRoute<Mod1Target>,
    pub mod2: ModulationRoute<Mod2Target>,
    pub envelope: EnvelopeDescriptor,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierDescriptor {
    pub rate_hz: f32,
    pub level: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayDescriptor {
    pub time_seconds: f32,
    pub feedback: f32,
    pub wet_dry: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationRoute<T> {
    pub rate_hz: f32,
    pub amount: f32,
    pub target: T,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeDescriptor {
    pub attack_ms: f32,
    pub decay_ms: f32,
    pub sustain_level: f32,
    pub release_ms: f32,
}

impl Default for EnvelopeDescriptor {
    fn default() -> Self {
        Self {
            attack_ms: 10.0,
            decay_ms: 100.0,
            sustain_level: 0.7,
            release_ms: 200.0,
        }
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::from_values("Classic Dub Siren", &ControlValues::default(), EnvelopeDescriptor::default())
    }
}

impl Patch {
    pub fn from_values(name: impl Into<String>, values: &ControlValues, envelope: EnvelopeDescriptor) -> Self {
        Self {
            name: name.into(),
            description: None,
            carrier: CarrierDescriptor {
                rate_hz: values.carrier_rate,
                level: values.carrier_level,
            },
            delay: DelayDescriptor {
                time_seconds: values.delay_time,
                feedback: values.delay_feedback,
                wet_dry: values.delay_wet_dry,
            },
            mod1: ModulationRoute {
                rate_hz: values.mod1_rate,
                amount: values.mod1_amount,
                target: values.mod1_target,
            },
            mod2: ModulationRoute {
                rate_hz: values.mod2_rate,
                amount: values.mod2_amount,
                target: values.mod2_target,
            },
            envelope,
        }
    }

    /// Capture the current state of a control surface.
    pub fn capture(name: impl Into<String>, controls: &Controls, envelope: EnvelopeDescriptor) -> Self {
        Self::from_values(name, &controls.snapshot(), envelope)
    }

    pub fn control_values(&self) -> ControlValues {
        ControlValues {
            carrier_rate: self.carrier.rate_hz,
            carrier_level: self.carrier.level,
            delay_time: self.delay.time_seconds,
            delay_feedback: self.delay.feedback,
            delay_wet_dry: self.delay.wet_dry,
            mod1_rate: self.mod1.rate_hz,
            mod1_amount: self.mod1.amount,
            mod1_target: self.mod1.target,
            mod2_rate: self.mod2.rate_hz,
            mod2_amount: self.mod2.amount,
            mod2_target: self.mod2.target,
        }
    }

    /// Write every control value through the clamping setters.
    ///
    /// The envelope is not a shared control; hand `self.envelope` to
    /// `SirenEngine::set_envelope` on the thread that owns the engine.
    pub fn apply(&self, controls: &Controls) {
        log::debug!("applying patch `{}`", self.name);
        controls.store(&self.control_values());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::controls::ControlId;

    #[test]
    fn default_patch_matches_default_controls() {
        let patch = Patch::default();
        assert_eq!(patch.control_values(), ControlValues::default());
        assert_eq!(patch.envelope, EnvelopeDescriptor::default());
        assert_eq!(patch.delay.time_seconds, 0.375);
    }

    #[test]
    fn apply_clamps_through_controls() {
        let mut patch = Patch::default();
        patch.carrier.rate_hz = 9_000.0;
        patch.delay.feedback = 1.2;
        patch.mod1.target = Mod1Target::DelayTime;

        let controls = Controls::new();
        patch.apply(&controls);

        assert_eq!(controls.get(ControlId::CarrierRate), 2_000.0);
        assert_eq!(controls.get(ControlId::DelayFeedback), 0.95);
        assert_eq!(controls.mod1_target(), Mod1Target::DelayTime);
    }

    #[test]
    fn capture_then_apply_restores_state() {
        let source = Controls::new();
        source.set(ControlId::Mod2Rate, 7.5);
        source.set_mod2_target(Mod2Target::Mod1Rate);
        let patch = Patch::capture("wobbler", &source, EnvelopeDescriptor::default());

        let target = Controls::new();
        patch.apply(&target);
        assert_eq!(target.snapshot(), source.snapshot());
    }
}

//! Lock-free parameter slots shared between a control thread and the render loop.
//!
//! Every control is its own atomic scalar. Writers clamp before storing, so the
//! render loop can load a slot at any time and always see a legal value. Loads
//! and stores use `Relaxed`: nothing orders one control against another, and a
//! single sample of cross-parameter skew is fine.

use std::sync::atomic::{AtomicU8, Ordering};

use atomic_float::AtomicF32;

use crate::{
    dsp::{
        delay::{MAX_DELAY_SECONDS, MAX_FEEDBACK, MIN_DELAY_SECONDS},
        lfo::{PRIMARY_RATE_RANGE, SECONDARY_RATE_RANGE},
        modulate::{Mod1Target, Mod2Target, RouteInputs, CARRIER_RATE_MAX, CARRIER_RATE_MIN},
    },
    error::EngineError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    CarrierRate,
    CarrierLevel,
    DelayTime,
    DelayFeedback,
    DelayWetDry,
    Mod1Rate,
    Mod1Amount,
    Mod1Target,
    Mod2Rate,
    Mod2Amount,
    Mod2Target,
}

impl ControlId {
    pub const ALL: [ControlId; 11] = [
        ControlId::CarrierRate,
        ControlId::CarrierLevel,
        ControlId::DelayTime,
        ControlId::DelayFeedback,
        ControlId::DelayWetDry,
        ControlId::Mod1Rate,
        ControlId::Mod1Amount,
        ControlId::Mod1Target,
        ControlId::Mod2Rate,
        ControlId::Mod2Amount,
        ControlId::Mod2Target,
    ];

    /// External name used by hosts and patches.
    pub fn name(self) -> &'static str {
        match self {
            ControlId::CarrierRate => "carrierRate",
            ControlId::CarrierLevel => "carrierLevel",
            ControlId::DelayTime => "delayTime",
            ControlId::DelayFeedback => "delayFeedback",
            ControlId::DelayWetDry => "delayWetDry",
            ControlId::Mod1Rate => "mod1Rate",
            ControlId::Mod1Amount => "mod1Amount",
            ControlId::Mod1Target => "mod1Target",
            ControlId::Mod2Rate => "mod2Rate",
            ControlId::Mod2Amount => "mod2Amount",
            ControlId::Mod2Target => "mod2Target",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Human-readable label for UIs.
    pub fn label(self) -> &'static str {
        match self {
            ControlId::CarrierRate => "Carrier Rate",
            ControlId::CarrierLevel => "Carrier Level",
            ControlId::DelayTime => "Delay Time",
            ControlId::DelayFeedback => "Delay Feedback",
            ControlId::DelayWetDry => "Delay Wet/Dry",
            ControlId::Mod1Rate => "LFO1 Rate",
            ControlId::Mod1Amount => "LFO1 Amount",
            ControlId::Mod1Target => "LFO1 Target",
            ControlId::Mod2Rate => "LFO2 Rate",
            ControlId::Mod2Amount => "LFO2 Amount",
            ControlId::Mod2Target => "LFO2 Target",
        }
    }

    /// Legal `(min, max)` for the control. Selectors report their index range.
    pub fn range(self) -> (f32, f32) {
        match self {
            ControlId::CarrierRate => (CARRIER_RATE_MIN, CARRIER_RATE_MAX),
            ControlId::DelayTime => (MIN_DELAY_SECONDS, MAX_DELAY_SECONDS),
            ControlId::DelayFeedback => (0.0, MAX_FEEDBACK),
            ControlId::Mod1Rate => (*PRIMARY_RATE_RANGE.start(), *PRIMARY_RATE_RANGE.end()),
            ControlId::Mod2Rate => (*SECONDARY_RATE_RANGE.start(), *SECONDARY_RATE_RANGE.end()),
            ControlId::Mod1Target => (0.0, (Mod1Target::ALL.len() - 1) as f32),
            ControlId::Mod2Target => (0.0, (Mod2Target::ALL.len() - 1) as f32),
            ControlId::CarrierLevel
            | ControlId::DelayWetDry
            | ControlId::Mod1Amount
            | ControlId::Mod2Amount => (0.0, 1.0),
        }
    }

    /// Whether the control picks a routing target rather than a level.
    pub fn is_selector(self) -> bool {
        matches!(self, ControlId::Mod1Target | ControlId::Mod2Target)
    }

    /// Bring a raw value into the control's legal range.
    ///
    /// Selectors are rounded to the nearest index. NaN has no meaningful
    /// nearest bound and yields `None`.
    pub fn clamp(self, value: f32) -> Option<f32> {
        if value.is_nan() {
            return None;
        }
        let (min, max) = self.range();
        let value = if self.is_selector() { value.round() } else { value };
        Some(value.clamp(min, max))
    }
}

/// Plain copy of every control, loaded slot by slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlValues {
    pub carrier_rate: f32,
    pub carrier_level: f32,
    pub delay_time: f32,
    pub delay_feedback: f32,
    pub delay_wet_dry: f32,
    pub mod1_rate: f32,
    pub mod1_amount: f32,
    pub mod1_target: Mod1Target,
    pub mod2_rate: f32,
    pub mod2_amount: f32,
    pub mod2_target: Mod2Target,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            carrier_rate: 440.0,
            carrier_level: 0.8,
            delay_time: 0.375,
            delay_feedback: 0.6,
            delay_wet_dry: 0.4,
            mod1_rate: 2.0,
            mod1_amount: 0.5,
            mod1_target: Mod1Target::None,
            mod2_rate: 0.5,
            mod2_amount: 0.3,
            mod2_target: Mod2Target::None,
        }
    }
}

impl ControlValues {
    pub fn get(&self, id: ControlId) -> f32 {
        match id {
            ControlId::CarrierRate => self.carrier_rate,
            ControlId::CarrierLevel => self.carrier_level,
            ControlId::DelayTime => self.delay_time,
            ControlId::DelayFeedback => self.delay_feedback,
            ControlId::DelayWetDry => self.delay_wet_dry,
            ControlId::Mod1Rate => self.mod1_rate,
            ControlId::Mod1Amount => self.mod1_amount,
            ControlId::Mod1Target => self.mod1_target.index() as f32,
            ControlId::Mod2Rate => self.mod2_rate,
            ControlId::Mod2Amount => self.mod2_amount,
            ControlId::Mod2Target => self.mod2_target.index() as f32,
        }
    }

    pub fn route_inputs(&self) -> RouteInputs {
        RouteInputs {
            carrier_rate: self.carrier_rate,
            delay_time: self.delay_time,
            delay_feedback: self.delay_feedback,
            delay_wet_dry: self.delay_wet_dry,
            mod1_rate: self.mod1_rate,
            mod1_amount: self.mod1_amount,
            mod1_target: self.mod1_target,
            mod2_rate: self.mod2_rate,
            mod2_amount: self.mod2_amount,
            mod2_target: self.mod2_target,
        }
    }
}

/// The shared control surface. Wrap in an `Arc` and hand one clone to each thread.
#[derive(Debug)]
pub struct Controls {
    carrier_rate: AtomicF32,
    carrier_level: AtomicF32,
    delay_time: AtomicF32,
    delay_feedback: AtomicF32,
    delay_wet_dry: AtomicF32,
    mod1_rate: AtomicF32,
    mod1_amount: AtomicF32,
    mod1_target: AtomicU8,
    mod2_rate: AtomicF32,
    mod2_amount: AtomicF32,
    mod2_target: AtomicU8,
}

impl Default for Controls {
    fn default() -> Self {
        Self::from_values(&ControlValues::default())
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: &ControlValues) -> Self {
        let controls = Self {
            carrier_rate: AtomicF32::new(0.0),
            carrier_level: AtomicF32::new(0.0),
            delay_time: AtomicF32::new(0.0),
            delay_feedback: AtomicF32::new(0.0),
            delay_wet_dry: AtomicF32::new(0.0),
            mod1_rate: AtomicF32::new(0.0),
            mod1_amount: AtomicF32::new(0.0),
            mod1_target: AtomicU8::new(0),
            mod2_rate: AtomicF32::new(0.0),
            mod2_amount: AtomicF32::new(0.0),
            mod2_target: AtomicU8::new(0),
        };
        controls.store(values);
        controls
    }

    /// Store a value, clamped to the control's range. NaN is ignored.
    pub fn set(&self, id: ControlId, value: f32) {
        let Some(value) = id.clamp(value) else {
            return;
        };

        match id {
            ControlId::CarrierRate => self.carrier_rate.store(value, Ordering::Relaxed),
            ControlId::CarrierLevel => self.carrier_level.store(value, Ordering::Relaxed),
            ControlId::DelayTime => self.delay_time.store(value, Ordering::Relaxed),
            ControlId::DelayFeedback => self.delay_feedback.store(value, Ordering::Relaxed),
            ControlId::DelayWetDry => self.delay_wet_dry.store(value, Ordering::Relaxed),
            ControlId::Mod1Rate => self.mod1_rate.store(value, Ordering::Relaxed),
            ControlId::Mod1Amount => self.mod1_amount.store(value, Ordering::Relaxed),
            ControlId::Mod1Target => self.mod1_target.store(value as u8, Ordering::Relaxed),
            ControlId::Mod2Rate => self.mod2_rate.store(value, Ordering::Relaxed),
            ControlId::Mod2Amount => self.mod2_amount.store(value, Ordering::Relaxed),
            ControlId::Mod2Target => self.mod2_target.store(value as u8, Ordering::Relaxed),
        }
    }

    pub fn get(&self, id: ControlId) -> f32 {
        match id {
            ControlId::CarrierRate => self.carrier_rate.load(Ordering::Relaxed),
            ControlId::CarrierLevel => self.carrier_level.load(Ordering::Relaxed),
            ControlId::DelayTime => self.delay_time.load(Ordering::Relaxed),
            ControlId::DelayFeedback => self.delay_feedback.load(Ordering::Relaxed),
            ControlId::DelayWetDry => self.delay_wet_dry.load(Ordering::Relaxed),
            ControlId::Mod1Rate => self.mod1_rate.load(Ordering::Relaxed),
            ControlId::Mod1Amount => self.mod1_amount.load(Ordering::Relaxed),
            ControlId::Mod1Target => self.mod1_target.load(Ordering::Relaxed) as f32,
            ControlId::Mod2Rate => self.mod2_rate.load(Ordering::Relaxed),
            ControlId::Mod2Amount => self.mod2_amount.load(Ordering::Relaxed),
            ControlId::Mod2Target => self.mod2_target.load(Ordering::Relaxed) as f32,
        }
    }

    /// Set a control by its external name.
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<(), EngineError> {
        match ControlId::from_name(name) {
            Some(id) => {
                self.set(id, value);
                Ok(())
            }
            None => {
                log::warn!("ignoring unknown control `{name}`");
                Err(EngineError::UnknownControl(name.to_owned()))
            }
        }
    }

    pub fn get_by_name(&self, name: &str) -> Result<f32, EngineError> {
        ControlId::from_name(name)
            .map(|id| self.get(id))
            .ok_or_else(|| EngineError::UnknownControl(name.to_owned()))
    }

    pub fn set_mod1_target(&self, target: Mod1Target) {
        self.mod1_target.store(target.index(), Ordering::Relaxed);
    }

    pub fn set_mod2_target(&self, target: Mod2Target) {
        self.mod2_target.store(target.index(), Ordering::Relaxed);
    }

    pub fn mod1_target(&self) -> Mod1Target {
        Mod1Target::from_index(self.mod1_target.load(Ordering::Relaxed))
    }

    pub fn mod2_target(&self) -> Mod2Target {
        Mod2Target::from_index(self.mod2_target.load(Ordering::Relaxed))
    }

    /// Write every slot from `values`, clamping each.
    pub fn store(&self, values: &ControlValues) {
        for id in ControlId::ALL {
            self.set(id, values.get(id));
        }
    }

    /// Load every slot. Each load is independent; the result is not atomic as a whole.
    #[inline]
    pub fn snapshot(&self) -> ControlValues {
        ControlValues {
            carrier_rate: self.carrier_rate.load(Ordering::Relaxed),
            carrier_level: self.carrier_level.load(Ordering::Relaxed),
            delay_time: self.delay_time.load(Ordering::Relaxed),
            delay_feedback: self.delay_feedback.load(Ordering::Relaxed),
            delay_wet_dry: self.delay_wet_dry.load(Ordering::Relaxed),
            mod1_rate: self.mod1_rate.load(Ordering::Relaxed),
            mod1_amount: self.mod1_amount.load(Ordering::Relaxed),
            mod1_target: self.mod1_target(),
            mod2_rate: self.mod2_rate.load(Ordering::Relaxed),
            mod2_amount: self.mod2_amount.load(Ordering::Relaxed),
            mod2_target: self.mod2_target(),
        }
    }
}

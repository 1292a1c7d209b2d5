//! Two-stage modulation routing.

/*
Parameter Modulation
====================

Modulation is using one signal to continuously vary a parameter of another.
The siren has exactly two modulators and a fixed menu of destinations for
each; there is no free patching.

Vocabulary
----------

  source      One of the two LFOs. Source 1 is the primary, source 2 the
              secondary.

  target      The parameter a source moves. Each source has its own menu and
              exactly one entry is active at a time (possibly None).

  mod         The source's bipolar output multiplied by its amount:
                  mod = lfo_output × amount          ∈ [-1, 1]

  base        The parameter's control value before modulation.


The Menus
---------

    Source 2 (secondary)                  Source 1 (primary)
    ────────────────────                  ──────────────────
    None                                  None
    Source-1 rate    base·(1 + 3·mod)     Carrier rate    base·(1 + 4·mod)
    Source-1 amount  base + 0.5·mod       Delay time      base·(1 + 0.5·mod)
    Delay wet/dry    base + 0.3·mod       Delay feedback  base + 0.3·mod

Every result is clamped back into the parameter's legal range, so a deep
swing can pin a parameter at its limit but never push it out.


Why Order Matters
-----------------

Source 2 can move source 1's rate and amount. For that to land in the same
sample, each tick must go:

    1. advance source 2, compute mod2
    2. adjust source 1's rate/amount with mod2, apply them to source 1
    3. advance source 1, compute mod1
    4. adjust carrier / delay parameters with mod1

Swapping 1-2 with 3 would make the cascade lag one sample behind.


State
-----

The router owns nothing. `route()` is a function of the current control
values and the two LFOs' phases; the LFOs belong to the engine.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    delay::{MAX_DELAY_SECONDS, MAX_FEEDBACK, MIN_DELAY_SECONDS},
    lfo::Lfo,
};

/// Carrier rate range that routing results are held to.
pub const CARRIER_RATE_MIN: f32 = 20.0;
pub const CARRIER_RATE_MAX: f32 = 2_000.0;

/// Multiplicative swing source 1 applies to the carrier rate.
pub const CARRIER_RATE_SWING: f32 = 4.0;
/// Multiplicative swing source 1 applies to the delay time.
pub const DELAY_TIME_SWING: f32 = 0.5;
/// Additive swing source 1 applies to the delay feedback.
pub const DELAY_FEEDBACK_SWING: f32 = 0.3;
/// Multiplicative swing source 2 applies to source 1's rate.
pub const MOD1_RATE_SWING: f32 = 3.0;
/// Additive swing source 2 applies to source 1's amount.
pub const MOD1_AMOUNT_SWING: f32 = 0.5;
/// Additive swing source 2 applies to the delay wet/dry mix.
pub const DELAY_WET_DRY_SWING: f32 = 0.3;

/// Destinations for the primary modulation source.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mod1Target {
    #[default]
    None,
    CarrierRate,
    DelayTime,
    DelayFeedback,
}

/// Destinations for the secondary modulation source.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mod2Target {
    #[default]
    None,
    Mod1Rate,
    Mod1Amount,
    DelayWetDry,
}

impl Mod1Target {
    pub const ALL: [Mod1Target; 4] = [
        Mod1Target::None,
        Mod1Target::CarrierRate,
        Mod1Target::DelayTime,
        Mod1Target::DelayFeedback,
    ];

    /// Map a selector index to a target, saturating at the last entry.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index as usize).min(Self::ALL.len() - 1)]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Mod1Target::None => "None",
            Mod1Target::CarrierRate => "Carrier Rate",
            Mod1Target::DelayTime => "Delay Time",
            Mod1Target::DelayFeedback => "Delay Feedback",
        }
    }
}

impl Mod2Target {
    pub const ALL: [Mod2Target; 4] = [
        Mod2Target::None,
        Mod2Target::Mod1Rate,
        Mod2Target::Mod1Amount,
        Mod2Target::DelayWetDry,
    ];

    /// Map a selector index to a target, saturating at the last entry.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index as usize).min(Self::ALL.len() - 1)]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Mod2Target::None => "None",
            Mod2Target::Mod1Rate => "LFO1 Rate",
            Mod2Target::Mod1Amount => "LFO1 Amount",
            Mod2Target::DelayWetDry => "Delay Wet/Dry",
        }
    }
}

/// Unmodulated values the router starts from each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInputs {
    pub carrier_rate: f32,
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

/// Final parameter values for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Routed {
    pub carrier_rate: f32,
    pub delay_time: f32,
    pub delay_feedback: f32,
    pub delay_wet_dry: f32,
    /// Source-1 rate after source-2 modulation (already applied to the LFO).
    pub mod1_rate: f32,
    /// Source-1 amount after source-2 modulation (already applied to the LFO).
    pub mod1_amount: f32,
}

/// Run both modulation stages for one sample.
///
/// Advances `mod2` then `mod1` by exactly one sample each.
pub fn route(inputs: &RouteInputs, mod1: &mut Lfo, mod2: &mut Lfo) -> Routed {
    let mut mod1_rate = inputs.mod1_rate;
    let mut mod1_amount = inputs.mod1_amount;
    let mut delay_wet_dry = inputs.delay_wet_dry;

    mod2.set_rate(inputs.mod2_rate);
    mod2.set_amount(inputs.mod2_amount);
    let mod2_value = mod2.next_sample() * mod2.amount();

    match inputs.mod2_target {
        Mod2Target::None => {}
        Mod2Target::Mod1Rate => {
            let range = mod1.rate_range();
            mod1_rate = (mod1_rate * (1.0 + mod2_value * MOD1_RATE_SWING))
                .clamp(*range.start(), *range.end());
        }
        Mod2Target::Mod1Amount => {
            mod1_amount = (mod1_amount + mod2_value * MOD1_AMOUNT_SWING).clamp(0.0, 1.0);
        }
        Mod2Target::DelayWetDry => {
            delay_wet_dry = (delay_wet_dry + mod2_value * DELAY_WET_DRY_SWING).clamp(0.0, 1.0);
        }
    }

    mod1.set_rate(mod1_rate);
    mod1.set_amount(mod1_amount);
    let mod1_value = mod1.next_sample() * mod1.amount();

    let mut carrier_rate = inputs.carrier_rate;
    let mut delay_time = inputs.delay_time;
    let mut delay_feedback = inputs.delay_feedback;

    match inputs.mod1_target {
        Mod1Target::None => {}
        Mod1Target::CarrierRate => {
            carrier_rate = (carrier_rate * (1.0 + mod1_value * CARRIER_RATE_SWING))
                .clamp(CARRIER_RATE_MIN, CARRIER_RATE_MAX);
        }
        Mod1Target::DelayTime => {
            delay_time = (delay_time * (1.0 + mod1_value * DELAY_TIME_SWING))
                .clamp(MIN_DELAY_SECONDS, MAX_DELAY_SECONDS);
        }
        Mod1Target::DelayFeedback => {
            delay_feedback = (delay_feedback + mod1_value * DELAY_FEEDBACK_SWING).clamp(0.0, MAX_FEEDBACK);
        }
    }

    Routed {
        carrier_rate,
        delay_time,
        delay_feedback,
        delay_wet_dry,
        mod1_rate: mod1.rate(),
        mod1_amount: mod1.amount(),
    }
}

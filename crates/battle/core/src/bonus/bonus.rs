use crate::ids::{CreatureId, Side, SpellId};

use super::kinds::{BonusDuration, BonusSource, BonusType, EffectRange, ValueType};

/// Restricts which bearers a propagated bonus actually affects.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusLimiter {
    Creature(CreatureId),
    Side(Side),
}

/// Where a bonus spreads from its source node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusPropagator {
    Battle,
    Army,
}

/// A single modifier attached to a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bonus {
    pub duration: BonusDuration,
    /// Remaining turns for [`BonusDuration::N_TURNS`] bonuses.
    pub turns_remain: i32,
    pub kind: BonusType,
    pub subtype: i32,
    pub source: BonusSource,
    /// Source id; the spell id for [`BonusSource::SpellEffect`].
    pub sid: u32,
    pub val: i32,
    pub value_type: ValueType,
    pub additional_info: i32,
    pub effect_range: EffectRange,
    pub description: String,
    pub limiter: Option<BonusLimiter>,
    pub propagator: Option<BonusPropagator>,
}

impl Bonus {
    pub fn new(kind: BonusType, source: BonusSource, val: i32, sid: u32) -> Self {
        Self {
            duration: BonusDuration::PERMANENT,
            turns_remain: 0,
            kind,
            subtype: 0,
            source,
            sid,
            val,
            value_type: ValueType::Additive,
            additional_info: 0,
            effect_range: EffectRange::NoLimit,
            description: String::new(),
            limiter: None,
            propagator: None,
        }
    }

    /// A timed bonus granted by `spell`.
    pub fn spell_effect(kind: BonusType, spell: SpellId, val: i32, turns: i32) -> Self {
        Self::new(kind, BonusSource::SpellEffect, val, spell.0)
            .with_duration(BonusDuration::N_TURNS)
            .with_turns(turns)
    }

    pub fn with_subtype(mut self, subtype: i32) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn with_duration(mut self, duration: BonusDuration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_turns(mut self, turns: i32) -> Self {
        self.turns_remain = turns;
        self
    }

    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_additional_info(mut self, info: i32) -> Self {
        self.additional_info = info;
        self
    }

    pub fn with_effect_range(mut self, range: EffectRange) -> Self {
        self.effect_range = range;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_limiter(mut self, limiter: BonusLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn with_propagator(mut self, propagator: BonusPropagator) -> Self {
        self.propagator = Some(propagator);
        self
    }

    /// Structural identity: every field except `turns_remain`, `limiter` and
    /// `propagator`. Two bonuses with the same identity describe the same
    /// effect at possibly different remaining durations.
    pub fn same_identity(&self, other: &Bonus) -> bool {
        self.duration == other.duration
            && self.kind == other.kind
            && self.subtype == other.subtype
            && self.source == other.source
            && self.val == other.val
            && self.sid == other.sid
            && self.value_type == other.value_type
            && self.additional_info == other.additional_info
            && self.effect_range == other.effect_range
            && self.description == other.description
    }

    /// True for spell-sourced bonuses of the same spell, type and subtype.
    /// Updates to such bonuses merge instead of stacking.
    pub fn same_spell_effect(&self, other: &Bonus) -> bool {
        self.source == BonusSource::SpellEffect
            && other.source == BonusSource::SpellEffect
            && self.sid == other.sid
            && self.kind == other.kind
            && self.subtype == other.subtype
    }
}

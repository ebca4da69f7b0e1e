//! Spells: definitions, receptivity, effects and cast orchestration.
//!
//! ```text
//! SpellCast ── can_cast ──> Effects::applicable / applicable_to
//!     │                          └─ each Effect: transform_target, is_valid_target
//!     │                                └─ Mechanics::is_receptive -> TargetCondition
//!     └─ cast / plan ─────> Effects::prepare -> apply_to_server / apply_to_battle
//! ```
mod cast;
mod caster;
mod condition;
mod effects;
mod mechanics;
mod problem;
mod spell;
mod target;

pub use cast::{CastReport, SpellCast};
pub use caster::{Caster, CasterProfile};
pub use condition::{
    ConditionItem, ConditionKind, ConditionSpec, ConditionTier, IdentifierResolver,
    TargetCondition, parse_identifier,
};
pub use effects::{
    DamageEffect, DispelEffect, Effect, EffectFactory, EffectKind, EffectOutcome, EffectParams,
    EffectRegistry, EffectSpec, Effects, EffectsError, HealEffect, ObstacleEffect, ParamValue,
    PreparedEffect, TeleportEffect,
};
pub use mechanics::{CastMode, Mechanics};
pub use problem::{Problem, ProblemKind};
pub use spell::{Positivity, Spell, SpellCatalog, SpellSchools};
pub use target::{Destination, EffectTarget, Target};

//! Tactical battle rules shared by the authoritative cast path and the AI.
//!
//! `battle-core` owns the data model (hexes, units, bonuses, obstacles), the
//! read/write capabilities over a battlefield ([`BattleView`],
//! [`BattleMutator`], [`ServerCallback`]), the spell receptivity engine and
//! the data-driven effect pipeline. [`BattleState`] is the in-memory
//! battlefield used by tests and by embedders without their own state.
//!
//! Nothing here performs I/O or owns randomness: content arrives already
//! parsed and stochastic outcomes draw from an injected [`RngOracle`].
pub mod battle;
pub mod bonus;
pub mod config;
pub mod error;
pub mod hex;
pub mod ids;
pub mod rng;
pub mod spells;
pub mod unit;

pub use battle::{
    BattleChange, BattleMutator, BattleState, BattleStateBuilder, BattleStateError, BattleView,
    CommandLog, Distances, NearestEnemy, Obstacle, ObstacleKind, ServerCallback, StagedBattle,
};
pub use bonus::{
    Bonus, BonusBearer, BonusDuration, BonusHandle, BonusList, BonusSet, BonusSource, BonusType,
    EffectRange, Selector, ValueType,
};
pub use config::BattleConfig;
pub use error::{BattleError, ErrorSeverity};
pub use hex::{BattleHex, HexDirection};
pub use ids::{CreatureId, ObstacleId, Side, SpellId, UnitId};
pub use rng::{PcgRng, RngOracle};
pub use spells::{
    CastMode, CastReport, Caster, CasterProfile, Destination, Effect, EffectKind, EffectRegistry,
    EffectSpec, Effects, EffectsError, Mechanics, Positivity, Problem, ProblemKind, Spell,
    SpellCast, SpellCatalog, SpellSchools, Target, TargetCondition,
};
pub use unit::{Combatant, HealLevel, HealPower, Unit, UnitHealth, UnitState};

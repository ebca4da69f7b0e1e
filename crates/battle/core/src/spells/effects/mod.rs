//! Spell effects: the pieces a spell is made of.
//!
//! # Architecture
//!
//! Same **Enum + Struct hybrid** as the rest of the crate:
//! - each effect is a plain struct (`DamageEffect`, `TeleportEffect`, ...)
//! - [`EffectKind`] wraps them and dispatches statically
//! - [`Effect`] adds the per-entry flags (`level`, `automatic`, `optional`)
//! - [`EffectRegistry`] maps data-driven type keys (`core:damage`) to
//!   constructors, populated explicitly at startup
//!
//! Every effect answers the same questions:
//!
//! ```text
//! applicable(problem, m)                     can it work at all in this cast?
//! applicable_to(problem, m, aim, target)     can it work on this target?
//! transform_target(m, aim, spell_target)     which concrete destinations?
//! is_valid_target(m, unit)                   per-unit filter
//! apply_to_server(server, rng, m, target)    send change records
//! apply_to_battle(battle, m, target)         mutate an in-memory battle
//! ```
//!
//! Both `apply` paths derive the same change records; the server path also
//! rolls damage variance and complains about illegal requests, the in-memory
//! path is deterministic and silent.
mod damage;
mod dispel;
mod error;
mod heal;
mod kinds;
mod obstacle;
mod params;
mod registry;
mod teleport;
mod unit_effect;

pub use damage::DamageEffect;
pub use dispel::DispelEffect;
pub use error::EffectsError;
pub use heal::HealEffect;
pub use kinds::EffectKind;
pub use obstacle::ObstacleEffect;
pub use params::{EffectParams, ParamValue};
pub use registry::{EffectFactory, EffectRegistry};
pub use teleport::TeleportEffect;

use tracing::error;

use crate::battle::{BattleMutator, ServerCallback};
use crate::config::BattleConfig;
use crate::ids::UnitId;
use crate::rng::RngOracle;
use crate::unit::Unit;

use super::mechanics::Mechanics;
use super::problem::Problem;
use super::target::{EffectTarget, Target};

/// One effect entry of a spell level.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub level: usize,
    /// Automatic effects are applied by every cast of the level.
    pub automatic: bool,
    /// A failing optional effect does not block the cast.
    pub optional: bool,
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            level: 0,
            automatic: true,
            optional: false,
            kind,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn manual(mut self) -> Self {
        self.automatic = false;
        self
    }

    pub fn applicable(&self, problem: &mut Problem, m: &Mechanics<'_>) -> bool {
        self.kind.applicable(problem, m)
    }

    pub fn applicable_to(
        &self,
        problem: &mut Problem,
        m: &Mechanics<'_>,
        aim: &Target,
        target: &EffectTarget,
    ) -> bool {
        self.kind.applicable_to(problem, m, aim, target)
    }

    pub fn transform_target(
        &self,
        m: &Mechanics<'_>,
        aim: &Target,
        spell_target: &Target,
    ) -> EffectTarget {
        self.kind.transform_target(m, aim, spell_target)
    }

    pub fn is_valid_target(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        self.kind.is_valid_target(m, unit)
    }

    pub fn apply_to_server(
        &self,
        server: &mut dyn ServerCallback,
        rng: &mut dyn RngOracle,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> EffectOutcome {
        self.kind.apply_to_server(server, rng, m, target)
    }

    pub fn apply_to_battle<B: BattleMutator + ?Sized>(
        &self,
        battle: &mut B,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> Result<(), B::Error> {
        self.kind.apply_to_battle(battle, m, target)
    }
}

/// What one applied effect reports back for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    pub damage_to_display: u64,
    pub affected: Vec<UnitId>,
    pub log: Vec<String>,
}

impl EffectOutcome {
    pub fn merge(&mut self, other: EffectOutcome) {
        self.damage_to_display += other.damage_to_display;
        for unit in other.affected {
            if !self.affected.contains(&unit) {
                self.affected.push(unit);
            }
        }
        self.log.extend(other.log);
    }
}

/// An automatic effect paired with the destinations it will be applied to.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedEffect<'e> {
    pub effect: &'e Effect,
    pub target: EffectTarget,
}

/// Parsed effect entry of a spell definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default = "EffectSpec::default_automatic"))]
    pub automatic: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: EffectParams,
}

impl EffectSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            automatic: true,
            optional: false,
            params: EffectParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    #[cfg(feature = "serde")]
    fn default_automatic() -> bool {
        true
    }
}

/// Effects of a spell, grouped by effect level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    levels: [Vec<Effect>; BattleConfig::EFFECT_LEVELS],
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mut effect: Effect, level: usize) -> Result<(), EffectsError> {
        let slot = self
            .levels
            .get_mut(level)
            .ok_or(EffectsError::LevelOutOfRange { level })?;
        effect.level = level;
        slot.push(effect);
        Ok(())
    }

    pub fn level(&self, level: usize) -> &[Effect] {
        self.levels.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }

    /// Builds one level from parsed entries. Entries with an unknown type or
    /// bad parameters are logged and skipped. Returns how many were added.
    pub fn load_level(
        &mut self,
        specs: &[EffectSpec],
        level: usize,
        registry: &EffectRegistry,
    ) -> Result<usize, EffectsError> {
        if level >= BattleConfig::EFFECT_LEVELS {
            return Err(EffectsError::LevelOutOfRange { level });
        }
        let mut loaded = 0;
        for spec in specs {
            match registry.create(spec) {
                Ok(effect) => {
                    self.add(effect, level)?;
                    loaded += 1;
                }
                Err(err) => {
                    error!(
                        target: "battle_core::spells",
                        effect = %spec.kind,
                        level,
                        error = %err,
                        "Skipping spell effect"
                    );
                }
            }
        }
        Ok(loaded)
    }

    /// Every non-optional effect of the active level must be applicable and
    /// at least one effect must succeed. Stops at the first blocking failure.
    pub fn applicable(&self, problem: &mut Problem, m: &Mechanics<'_>) -> bool {
        self.check_level(m, |e| e.applicable(problem, m))
    }

    /// Target-aware variant of [`Effects::applicable`]; each effect is checked
    /// against its own transformed target.
    pub fn applicable_to(
        &self,
        problem: &mut Problem,
        m: &Mechanics<'_>,
        aim: &Target,
        spell_target: &Target,
    ) -> bool {
        self.check_level(m, |e| {
            let target = e.transform_target(m, aim, spell_target);
            e.applicable_to(problem, m, aim, &target)
        })
    }

    fn check_level(&self, m: &Mechanics<'_>, mut check: impl FnMut(&Effect) -> bool) -> bool {
        let mut any_success = false;
        for effect in self.level(m.effect_level()) {
            if check(effect) {
                any_success = true;
            } else if !effect.optional {
                return false;
            }
        }
        any_success
    }

    /// Target manifest of every automatic effect at the active level, in order.
    pub fn prepare(
        &self,
        m: &Mechanics<'_>,
        aim: &Target,
        spell_target: &Target,
    ) -> Vec<PreparedEffect<'_>> {
        self.level(m.effect_level())
            .iter()
            .filter(|e| e.automatic)
            .map(|effect| PreparedEffect {
                effect,
                target: effect.transform_target(m, aim, spell_target),
            })
            .collect()
    }
}

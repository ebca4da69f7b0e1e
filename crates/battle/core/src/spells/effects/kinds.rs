//! Effect kind enum and dispatcher.

use crate::battle::{BattleMutator, ServerCallback};
use crate::rng::RngOracle;
use crate::unit::Unit;

use super::super::mechanics::Mechanics;
use super::super::problem::Problem;
use super::super::target::{EffectTarget, Target};
use super::EffectOutcome;
use super::damage::DamageEffect;
use super::dispel::DispelEffect;
use super::heal::HealEffect;
use super::obstacle::ObstacleEffect;
use super::teleport::TeleportEffect;

/// The concrete behaviour of an effect entry.
///
/// Each variant delegates to its struct.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    // ========================================================================
    // Unit effects
    // ========================================================================
    Damage(DamageEffect),
    Heal(HealEffect),
    Dispel(DispelEffect),
    Teleport(TeleportEffect),

    // ========================================================================
    // Location effects
    // ========================================================================
    Obstacle(ObstacleEffect),
}

impl EffectKind {
    /// Registry key of the effect type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Damage(_) => DamageEffect::NAME,
            Self::Heal(_) => HealEffect::NAME,
            Self::Dispel(_) => DispelEffect::NAME,
            Self::Teleport(_) => TeleportEffect::NAME,
            Self::Obstacle(_) => ObstacleEffect::NAME,
        }
    }

    pub fn applicable(&self, problem: &mut Problem, m: &Mechanics<'_>) -> bool {
        match self {
            Self::Damage(e) => e.applicable(problem, m),
            Self::Heal(e) => e.applicable(problem, m),
            Self::Dispel(e) => e.applicable(problem, m),
            Self::Teleport(e) => e.applicable(problem, m),
            Self::Obstacle(e) => e.applicable(problem, m),
        }
    }

    pub fn applicable_to(
        &self,
        problem: &mut Problem,
        m: &Mechanics<'_>,
        aim: &Target,
        target: &EffectTarget,
    ) -> bool {
        match self {
            Self::Damage(e) => e.applicable_to(problem, m, aim, target),
            Self::Heal(e) => e.applicable_to(problem, m, aim, target),
            Self::Dispel(e) => e.applicable_to(problem, m, aim, target),
            Self::Teleport(e) => e.applicable_to(problem, m, aim, target),
            Self::Obstacle(e) => e.applicable_to(problem, m, aim, target),
        }
    }

    pub fn transform_target(
        &self,
        m: &Mechanics<'_>,
        aim: &Target,
        spell_target: &Target,
    ) -> EffectTarget {
        match self {
            Self::Damage(e) => e.transform_target(m, aim, spell_target),
            Self::Heal(e) => e.transform_target(m, aim, spell_target),
            Self::Dispel(e) => e.transform_target(m, aim, spell_target),
            Self::Teleport(e) => e.transform_target(m, aim, spell_target),
            Self::Obstacle(e) => e.transform_target(m, aim, spell_target),
        }
    }

    pub fn is_valid_target(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        match self {
            Self::Damage(e) => e.is_valid_target(m, unit),
            Self::Heal(e) => e.is_valid_target(m, unit),
            Self::Dispel(e) => e.is_valid_target(m, unit),
            Self::Teleport(e) => e.is_valid_target(m, unit),
            Self::Obstacle(e) => e.is_valid_target(m, unit),
        }
    }

    pub fn apply_to_server(
        &self,
        server: &mut dyn ServerCallback,
        rng: &mut dyn RngOracle,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> EffectOutcome {
        match self {
            Self::Damage(e) => e.apply_to_server(server, rng, m, target),
            Self::Heal(e) => e.apply_to_server(server, rng, m, target),
            Self::Dispel(e) => e.apply_to_server(server, rng, m, target),
            Self::Teleport(e) => e.apply_to_server(server, rng, m, target),
            Self::Obstacle(e) => e.apply_to_server(server, rng, m, target),
        }
    }

    pub fn apply_to_battle<B: BattleMutator + ?Sized>(
        &self,
        battle: &mut B,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> Result<(), B::Error> {
        match self {
            Self::Damage(e) => e.apply_to_battle(battle, m, target),
            Self::Heal(e) => e.apply_to_battle(battle, m, target),
            Self::Dispel(e) => e.apply_to_battle(battle, m, target),
            Self::Teleport(e) => e.apply_to_battle(battle, m, target),
            Self::Obstacle(e) => e.apply_to_battle(battle, m, target),
        }
    }
}

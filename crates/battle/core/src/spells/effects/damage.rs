//! Damage effect.

use crate::battle::{BattleChange, BattleMutator, ServerCallback};
use crate::bonus::{BonusBearer, BonusType, Selector};
use crate::rng::RngOracle;
use crate::unit::Unit;

use super::super::mechanics::Mechanics;
use super::super::problem::Problem;
use super::super::target::{EffectTarget, Target};
use super::error::EffectsError;
use super::params::{EffectParams, Params};
use super::{EffectOutcome, unit_effect};

/// Deals the cast's effect power as damage to every target unit.
///
/// `kill_by_count` turns power into a number of creatures to kill (power x
/// max health of the target). `ignore_immunity` lets the damage through every
/// immunity except absolute immunity to this exact spell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DamageEffect {
    pub kill_by_count: bool,
    pub ignore_immunity: bool,
    /// Random spread of the damage in percent, server path only.
    pub variance_percent: u32,
}

impl DamageEffect {
    pub const NAME: &'static str = "core:damage";

    pub fn from_params(params: &EffectParams) -> Result<Self, EffectsError> {
        let p = Params::new(Self::NAME, params);
        Ok(Self {
            kill_by_count: p.bool("killByCount", false)?,
            ignore_immunity: p.bool("ignoreImmunity", false)?,
            variance_percent: p.uint("variancePercent", 0)?,
        })
    }

    pub fn is_valid_target(&self, _m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        unit.is_valid_target(false)
    }

    fn accepts(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        if !self.is_valid_target(m, unit) {
            return false;
        }
        if self.ignore_immunity {
            !unit.has_bonus(&Selector::TypeSubtypeInfo(
                BonusType::SpellImmunity,
                m.spell.id.0 as i32,
                1,
            ))
        } else {
            m.is_receptive(unit)
        }
    }

    pub fn applicable(&self, problem: &mut Problem, m: &Mechanics<'_>) -> bool {
        unit_effect::applicable(problem, m, |u| self.accepts(m, u))
    }

    pub fn applicable_to(
        &self,
        problem: &mut Problem,
        m: &Mechanics<'_>,
        _aim: &Target,
        target: &EffectTarget,
    ) -> bool {
        unit_effect::applicable_to(problem, m, target, |u| self.accepts(m, u))
    }

    pub fn transform_target(
        &self,
        m: &Mechanics<'_>,
        aim: &Target,
        spell_target: &Target,
    ) -> EffectTarget {
        unit_effect::transform_target(m, aim, spell_target, |u| self.accepts(m, u))
    }

    fn base_damage(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> u64 {
        let power = m.effect_power().max(0) as u64;
        if self.kill_by_count {
            power.saturating_mul(u64::from(unit.max_health()))
        } else {
            power
        }
    }

    /// `base * percent / 100`, saturating at `u64::MAX`.
    fn scale(base: u64, percent: u64) -> u64 {
        let scaled = u128::from(base) * u128::from(percent) / 100;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    fn changes(
        &self,
        m: &Mechanics<'_>,
        target: &EffectTarget,
        mut roll: impl FnMut(u64) -> u64,
    ) -> (Vec<BattleChange>, EffectOutcome) {
        let units = unit_effect::units(m, target);
        let mut outcome = EffectOutcome::default();
        let mut changes = Vec::with_capacity(units.len());

        if self.kill_by_count {
            let power = m.effect_power().max(0) as u64;
            outcome.damage_to_display = units
                .first()
                .map(|u| power.min(u64::from(u.count())))
                .unwrap_or(0);
        }

        for unit in units {
            let mut health = unit.state().health;
            let result = health.damage(roll(self.base_damage(m, unit)), unit.max_health());
            changes.push(BattleChange::StackAttacked {
                attacker: None,
                defender: unit.unit_id(),
                damage: result.dealt,
                killed: result.killed,
                health,
                spell: Some(m.spell.id),
            });
            if !self.kill_by_count {
                outcome.damage_to_display += result.dealt;
            }
            outcome.affected.push(unit.unit_id());
            outcome.log.push(if self.kill_by_count {
                match result.killed {
                    0 => format!("{} resists the gaze of {}", unit.unit_id(), m.caster.caster_name()),
                    1 => format!(
                        "One creature of {} dies under the terrible gaze of {}",
                        unit.unit_id(),
                        m.caster.caster_name()
                    ),
                    n => format!(
                        "{n} creatures of {} die under the terrible gaze of {}",
                        unit.unit_id(),
                        m.caster.caster_name()
                    ),
                }
            } else {
                format!(
                    "{} deals {} damage to {}, {} perish",
                    m.spell_name(),
                    result.dealt,
                    unit.unit_id(),
                    result.killed
                )
            });
        }
        (changes, outcome)
    }

    pub fn apply_to_server(
        &self,
        server: &mut dyn ServerCallback,
        rng: &mut dyn RngOracle,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> EffectOutcome {
        let variance = u64::from(self.variance_percent.min(100));
        let (changes, outcome) = self.changes(m, target, |base| {
            if variance == 0 {
                return base;
            }
            let factor = 100 - variance + u64::from(rng.range(0, 2 * variance as u32));
            Self::scale(base, factor)
        });
        for change in changes {
            server.send(change);
        }
        outcome
    }

    pub fn apply_to_battle<B: BattleMutator + ?Sized>(
        &self,
        battle: &mut B,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> Result<(), B::Error> {
        let (changes, _) = self.changes(m, target, |base| base);
        battle.apply_all(&changes)
    }
}

use crate::battle::{BattleChange, BattleMutator, ServerCallback};
use crate::rng::RngOracle;
use crate::unit::{HealLevel, HealPower, Unit};

use super::super::mechanics::Mechanics;
use super::super::problem::Problem;
use super::super::target::{EffectTarget, Target};
use super::error::EffectsError;
use super::params::{EffectParams, Params};
use super::{EffectOutcome, unit_effect};

/// Restores health, optionally resurrecting dead creatures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealEffect {
    pub level: HealLevel,
    pub power: HealPower,
    /// Minimum missing health, in whole creatures, for a living target to
    /// qualify. Zero means any wound.
    pub min_full_units: u32,
}

impl HealEffect {
    pub const NAME: &'static str = "core:heal";

    pub fn from_params(params: &EffectParams) -> Result<Self, EffectsError> {
        let p = Params::new(Self::NAME, params);
        Ok(Self {
            level: p.choice(
                "healLevel",
                HealLevel::Heal,
                &[
                    ("heal", HealLevel::Heal),
                    ("resurrect", HealLevel::Resurrect),
                    ("overHeal", HealLevel::OverHeal),
                ],
            )?,
            power: p.choice(
                "healPower",
                HealPower::Permanent,
                &[
                    ("oneBattle", HealPower::OneBattle),
                    ("permanent", HealPower::Permanent),
                ],
            )?,
            min_full_units: p.uint("minFullUnits", 0)?,
        })
    }

    /// Living targets need enough missing health. Dead targets need a level
    /// that resurrects and a hex no living unit stands on.
    pub fn is_valid_target(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        let only_alive = self.level == HealLevel::Heal;
        if !unit.is_valid_target(!only_alive) {
            return false;
        }

        if unit.alive() {
            let injuries = unit.total_health().saturating_sub(unit.available_health());
            let required = if self.min_full_units == 0 {
                1
            } else {
                u64::from(self.min_full_units) * u64::from(unit.max_health())
            };
            injuries >= required
        } else {
            self.level.allows_resurrection() && m.view.unit_at(unit.position()).is_none()
        }
    }

    fn accepts(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        self.is_valid_target(m, unit) && m.is_receptive(unit)
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

    fn changes(&self, m: &Mechanics<'_>, target: &EffectTarget) -> (Vec<BattleChange>, EffectOutcome) {
        let amount = m.effect_power().max(0) as u64;
        let mut changes = Vec::new();
        let mut outcome = EffectOutcome::default();

        for unit in unit_effect::units(m, target) {
            let mut state = unit.state().clone();
            let count_before = state.health.count;
            let healed = state.health.heal(
                amount,
                unit.max_health(),
                state.base_count,
                self.level,
                self.power,
            );
            if healed == 0 {
                continue;
            }
            let raised = state.health.count.saturating_sub(count_before);
            outcome.affected.push(unit.unit_id());
            outcome.log.push(if raised > 0 {
                format!("{} restores {healed} health to {}, {raised} rise", m.spell_name(), unit.unit_id())
            } else {
                format!("{} restores {healed} health to {}", m.spell_name(), unit.unit_id())
            });
            changes.push(BattleChange::UnitChanged(state));
        }
        (changes, outcome)
    }

    pub fn apply_to_server(
        &self,
        server: &mut dyn ServerCallback,
        _rng: &mut dyn RngOracle,
        m: &Mechanics<'_>,
        target: &EffectTarget,
    ) -> EffectOutcome {
        let (changes, outcome) = self.changes(m, target);
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
        battle.apply_all(&self.changes(m, target).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleState, BattleView};
    use crate::hex::BattleHex;
    use crate::ids::{CreatureId, Side, SpellId, UnitId};
    use crate::spells::{CastMode, CasterProfile, Positivity, Spell};
    use crate::unit::UnitHealth;

    fn hurt(battle: &mut BattleState, unit: u32, damage: u64) {
        let mut health = battle.unit(UnitId(unit)).unwrap().state().health;
        let max = battle.unit(UnitId(unit)).unwrap().max_health();
        health.damage(damage, max);
        battle
            .apply_change(&BattleChange::StackAttacked {
                attacker: None,
                defender: UnitId(unit),
                damage,
                killed: 0,
                health,
                spell: None,
            })
            .unwrap();
    }

    fn setup() -> BattleState {
        BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(3, 5), 10, 10, 5)
            .unit(CreatureId(2), Side::Attacker, BattleHex::from_xy(3, 7), 4, 10, 5)
            .build()
    }

    fn cure() -> Spell {
        let mut spell = Spell::new(SpellId(37), "cure");
        spell.positivity = Positivity::Positive;
        spell
    }

    #[test]
    fn full_health_units_are_not_healed() {
        let mut battle = setup();
        hurt(&mut battle, 1, 5);
        let spell = cure();
        let caster = CasterProfile::new("Cleric", Side::Attacker, 0);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&battle, &caster, &spell, &catalog, CastMode::Hero);
        let heal = HealEffect::default();

        assert!(!heal.is_valid_target(&m, battle.unit(UnitId(0)).unwrap()));
        assert!(heal.is_valid_target(&m, battle.unit(UnitId(1)).unwrap()));

        let picky = HealEffect {
            min_full_units: 1,
            ..HealEffect::default()
        };
        assert!(!picky.is_valid_target(&m, battle.unit(UnitId(1)).unwrap()));
    }

    #[test]
    fn dead_units_need_resurrection_and_a_free_hex() {
        let mut battle = setup();
        hurt(&mut battle, 1, 40);
        assert!(!battle.unit(UnitId(1)).unwrap().alive());

        let spell = cure();
        let caster = CasterProfile::new("Cleric", Side::Attacker, 0);
        let catalog: Vec<Spell> = Vec::new();
        let heal = HealEffect::default();
        let raise = HealEffect {
            level: HealLevel::Resurrect,
            ..HealEffect::default()
        };
        {
            let m = Mechanics::new(&battle, &caster, &spell, &catalog, CastMode::Hero);
            let dead = battle.unit(UnitId(1)).unwrap();
            assert!(!heal.is_valid_target(&m, dead));
            assert!(raise.is_valid_target(&m, dead));
        }

        battle
            .apply_change(&BattleChange::StackMoved {
                unit: UnitId(0),
                tiles: vec![BattleHex::from_xy(3, 7)],
                distance: Some(2),
                teleporting: false,
            })
            .unwrap();
        let m = Mechanics::new(&battle, &caster, &spell, &catalog, CastMode::Hero);
        assert!(!raise.is_valid_target(&m, battle.unit(UnitId(1)).unwrap()));
    }

    #[test]
    fn resurrection_restores_creatures_in_memory() {
        let mut battle = setup();
        hurt(&mut battle, 1, 40);
        let snapshot = battle.clone();
        let mut spell = cure();
        spell.level_power = [25; 4];
        let caster = CasterProfile::new("Cleric", Side::Attacker, 0);
        let catalog: Vec<Spell> = Vec::new();
        let m = Mechanics::new(&snapshot, &caster, &spell, &catalog, CastMode::Hero);
        let raise = HealEffect {
            level: HealLevel::Resurrect,
            power: HealPower::OneBattle,
            min_full_units: 0,
        };
        let aim = vec![crate::spells::Destination::hex(BattleHex::from_xy(3, 7))];
        let target = raise.transform_target(&m, &aim, &Vec::new());
        raise.apply_to_battle(&mut battle, &m, &target).unwrap();

        let raised = battle.unit(UnitId(1)).unwrap();
        assert_eq!(
            raised.state().health,
            UnitHealth {
                count: 3,
                first_hp_left: 5,
                resurrected: 3
            }
        );
    }

    #[test]
    fn unknown_heal_level_is_rejected() {
        let params = EffectParams::from([(
            "healLevel".to_owned(),
            crate::spells::ParamValue::Str("revive".to_owned()),
        )]);
        assert!(HealEffect::from_params(&params).is_err());
    }
}

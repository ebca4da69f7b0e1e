//! Attack scoring.
//!
//! [`TargetEvaluator`](crate::TargetEvaluator) enumerates legal attacks and
//! asks an [`AttackEvaluator`] to score each one. [`DamageEstimator`] is the
//! stock evaluator:
//!
//! ```text
//! score = expected damage dealt - expected retaliation * retaliation_weight / 100
//! ```
//!
//! Expected damage uses the average creature damage, so the estimate is
//! deterministic and never consumes randomness.

use std::fmt;

use battle_core::{
    BattleConfig, BattleHex, BattleView, BonusBearer, BonusType, Selector, Unit, UnitId,
};
use tracing::trace;

/// One legal attack together with its estimated outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOption {
    pub attacker: UnitId,
    pub defender: UnitId,
    /// Hex the attacker strikes from; `None` for shots.
    pub hex: Option<BattleHex>,
    pub shooting: bool,
    /// Hexes travelled before a melee strike.
    pub charged_fields: u32,
    pub damage_dealt: u64,
    pub damage_received: u64,
    pub kills: u32,
    pub score: i64,
}

/// Everything an evaluator sees about one candidate attack.
#[derive(Clone, Copy)]
pub struct AttackContext<'a> {
    pub view: &'a dyn BattleView,
    pub attacker: &'a dyn Unit,
    pub defender: &'a dyn Unit,
    pub shooting: bool,
    pub charged_fields: u32,
}

impl fmt::Debug for AttackContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackContext")
            .field("attacker", &self.attacker.unit_id())
            .field("defender", &self.defender.unit_id())
            .field("shooting", &self.shooting)
            .field("charged_fields", &self.charged_fields)
            .finish_non_exhaustive()
    }
}

pub trait AttackEvaluator {
    fn evaluate(&self, ctx: &AttackContext<'_>, hex: Option<BattleHex>) -> AttackOption;
}

/// Expected-damage scorer driven by [`BattleConfig`].
#[derive(Clone, Debug, Default)]
pub struct DamageEstimator {
    config: BattleConfig,
}

impl DamageEstimator {
    /// Shots beyond this many hexes deal half damage.
    pub const LONG_RANGE: u32 = 10;

    const MIN_FACTOR_PERCENT: i64 = 30;
    const MAX_FACTOR_PERCENT: i64 = 400;

    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Expected damage of `count` creatures of `striker` hitting `target`.
    pub fn strike(
        &self,
        striker: &dyn Unit,
        count: u32,
        target: &dyn Unit,
        shooting: bool,
        charged_fields: u32,
    ) -> u64 {
        let min = striker.value_of(&Selector::TypeSubtype(BonusType::CreatureDamage, 1));
        let max = striker.value_of(&Selector::TypeSubtype(BonusType::CreatureDamage, 2));
        let per_creature = i64::from((min + max.max(min)) / 2).max(1);
        let base = per_creature * i64::from(count);

        let step = i64::from(self.config.attack_defense_step_percent);
        let skill = i64::from(striker.attack()) - i64::from(target.defense());
        let mut percent =
            (100 + skill * step).clamp(Self::MIN_FACTOR_PERCENT, Self::MAX_FACTOR_PERCENT);

        if !shooting && striker.has_bonus_of_type(BonusType::Jousting) {
            percent += i64::from(self.config.charge_bonus_percent) * i64::from(charged_fields);
        }

        let mut damage = base * percent / 100;
        if shooting {
            let distance = BattleHex::distance(striker.position(), target.position());
            if distance > Self::LONG_RANGE
                && !striker.has_bonus_of_type(BonusType::NoDistancePenalty)
            {
                damage /= 2;
            }
        } else if striker.has_bonus_of_type(BonusType::Shooter)
            && !striker.has_bonus_of_type(BonusType::NoMeleePenalty)
        {
            damage /= 2;
        }
        damage.max(0) as u64
    }

    fn retaliates(attacker: &dyn Unit, defender: &dyn Unit, shooting: bool) -> bool {
        !shooting
            && !attacker.has_bonus_of_type(BonusType::BlocksRetaliation)
            && !defender.has_bonus_of_type(BonusType::NoRetaliation)
    }
}

impl AttackEvaluator for DamageEstimator {
    fn evaluate(&self, ctx: &AttackContext<'_>, hex: Option<BattleHex>) -> AttackOption {
        let (attacker, defender) = (ctx.attacker, ctx.defender);

        let expected = self.strike(
            attacker,
            attacker.count(),
            defender,
            ctx.shooting,
            ctx.charged_fields,
        );
        let mut health = defender.state().health;
        let hit = health.damage(expected, defender.max_health());

        let retaliation = health.count > 0 && Self::retaliates(attacker, defender, ctx.shooting);
        let damage_received = if retaliation {
            self.strike(defender, health.count, attacker, false, 0)
                .min(attacker.available_health())
        } else {
            0
        };

        let weight = i64::from(self.config.retaliation_weight_percent);
        let score = hit.dealt as i64 - damage_received as i64 * weight / 100;
        trace!(
            target: "battle_ai::attack",
            attacker = %attacker.unit_id(),
            defender = %defender.unit_id(),
            dealt = hit.dealt,
            killed = hit.killed,
            received = damage_received,
            score,
            "attack estimated"
        );

        AttackOption {
            attacker: attacker.unit_id(),
            defender: defender.unit_id(),
            hex,
            shooting: ctx.shooting,
            charged_fields: ctx.charged_fields,
            damage_dealt: hit.dealt,
            damage_received,
            kills: hit.killed,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BattleState, Bonus, BonusSource, CreatureId, Side, ValueType};

    fn damage(min: i32, max: i32) -> [Bonus; 2] {
        [
            Bonus::new(BonusType::CreatureDamage, BonusSource::Creature, min, 0)
                .with_subtype(1)
                .with_value_type(ValueType::BaseNumber),
            Bonus::new(BonusType::CreatureDamage, BonusSource::Creature, max, 0)
                .with_subtype(2)
                .with_value_type(ValueType::BaseNumber),
        ]
    }

    fn flag(kind: BonusType) -> Bonus {
        Bonus::new(kind, BonusSource::Creature, 0, 0)
    }

    /// Attacker #0 at (2,5), defender #1 at `defender_at`.
    fn battle(attacker: &[Bonus], defender_at: BattleHex) -> BattleState {
        let [min, max] = damage(1, 3);
        let mut builder = BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(2, 5), 10, 10, 5)
            .bonus(min)
            .bonus(max);
        for bonus in attacker {
            builder = builder.bonus(bonus.clone());
        }
        let [min, max] = damage(2, 2);
        builder
            .unit(CreatureId(2), Side::Defender, defender_at, 5, 10, 5)
            .bonus(min)
            .bonus(max)
            .build()
    }

    fn evaluate(state: &BattleState, shooting: bool, charged_fields: u32) -> AttackOption {
        let ctx = AttackContext {
            view: state,
            attacker: state.unit(UnitId(0)).unwrap(),
            defender: state.unit(UnitId(1)).unwrap(),
            shooting,
            charged_fields,
        };
        DamageEstimator::default().evaluate(&ctx, None)
    }

    #[test]
    fn melee_counts_kills_and_retaliation() {
        let state = battle(&[], BattleHex::from_xy(3, 5));
        let option = evaluate(&state, false, 0);
        assert_eq!(option.damage_dealt, 20);
        assert_eq!(option.kills, 2);
        // three survivors strike back for 2 each
        assert_eq!(option.damage_received, 6);
        assert_eq!(option.score, 14);
    }

    #[test]
    fn blocked_retaliation_scores_full_damage() {
        let state = battle(&[flag(BonusType::BlocksRetaliation)], BattleHex::from_xy(3, 5));
        let option = evaluate(&state, false, 0);
        assert_eq!(option.damage_received, 0);
        assert_eq!(option.score, 20);
    }

    #[test]
    fn damage_is_capped_by_defender_health() {
        let [min, max] = damage(10, 10);
        let state = battle(&[min, max], BattleHex::from_xy(3, 5));
        let option = evaluate(&state, false, 0);
        assert_eq!(option.damage_dealt, 50);
        assert_eq!(option.kills, 5);
        assert_eq!(option.damage_received, 0);
    }

    #[test]
    fn jousting_adds_charge_bonus() {
        let state = battle(&[flag(BonusType::Jousting)], BattleHex::from_xy(3, 5));
        // 4 hexes at 5% each: 20 * 120%
        assert_eq!(evaluate(&state, false, 4).damage_dealt, 24);
        assert_eq!(evaluate(&state, false, 0).damage_dealt, 20);
    }

    #[test]
    fn shooters_are_penalised_in_melee_and_at_range() {
        let close = battle(&[flag(BonusType::Shooter)], BattleHex::from_xy(3, 5));
        assert_eq!(evaluate(&close, false, 0).damage_dealt, 10);

        let far = battle(&[flag(BonusType::Shooter)], BattleHex::from_xy(14, 5));
        let shot = evaluate(&far, true, 0);
        assert_eq!(shot.damage_dealt, 10);
        assert_eq!(shot.damage_received, 0);

        let sharpshooter = battle(
            &[flag(BonusType::Shooter), flag(BonusType::NoDistancePenalty)],
            BattleHex::from_xy(14, 5),
        );
        assert_eq!(evaluate(&sharpshooter, true, 0).damage_dealt, 20);
    }

    #[test]
    fn attack_advantage_scales_damage() {
        let skill = Bonus::new(BonusType::PrimarySkill, BonusSource::Creature, 4, 0);
        let state = battle(&[skill], BattleHex::from_xy(3, 5));
        // +4 attack at 5% per point
        assert_eq!(evaluate(&state, false, 0).damage_dealt, 24);
    }
}

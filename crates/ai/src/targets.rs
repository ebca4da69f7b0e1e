//! Attack enumeration for one unit.
//!
//! [`TargetEvaluator`] walks every enemy the attacker could engage this turn,
//! scores each legal attack through an [`AttackEvaluator`] and remembers the
//! enemies it cannot get at:
//!
//! - a legal shot yields exactly one shooting option (no hex, no charge);
//! - otherwise each reachable hex next to the enemy yields one melee option,
//!   charged with the distance walked to it, in reachable-hex order;
//! - an enemy with no option at all is unreachable.
//!
//! A unit compelled to attack the nearest creature considers nothing but the
//! unit [`BattleView::nearest_enemy`] reports, whatever side it is on, and
//! only ever walks up to it: compelled shooters do not shoot.

use std::fmt;

use battle_core::{BattleHex, BattleView, BonusBearer, BonusType, Distances, Unit, UnitId};
use tracing::{debug, trace};

use crate::attack::{AttackContext, AttackEvaluator, AttackOption};
use crate::error::TargetError;

pub struct TargetEvaluator<'a> {
    attacker: UnitId,
    possible_attacks: Vec<AttackOption>,
    unreachable_enemies: Vec<&'a dyn Unit>,
}

/// Per-attacker data shared by every candidate.
struct Reach<'u> {
    attacker: &'u dyn Unit,
    distances: Distances,
    hexes: Vec<BattleHex>,
}

impl<'a> TargetEvaluator<'a> {
    /// Enumerates the attacks of `attacker` against `view`.
    ///
    /// The attacker is re-read from `view`, so a look-ahead view answers with
    /// its overlaid state; the given unit is used as is only when the view
    /// does not list it.
    pub fn new(
        attacker: &dyn Unit,
        view: &'a dyn BattleView,
        evaluator: &dyn AttackEvaluator,
    ) -> Self {
        let attacker = view.unit(attacker.unit_id()).unwrap_or(attacker);
        let from = attacker.position();
        let reach = Reach {
            attacker,
            distances: view.distances(attacker, from),
            hexes: view.available_hexes(attacker, from),
        };

        let mut this = Self {
            attacker: attacker.unit_id(),
            possible_attacks: Vec::new(),
            unreachable_enemies: Vec::new(),
        };

        if attacker.has_bonus_of_type(BonusType::AttacksNearestCreature) {
            if let Some(nearest) = view.nearest_enemy(attacker) {
                this.engage_nearest(view, evaluator, &reach, nearest.unit, nearest.hex);
            }
        } else {
            for enemy in view.alive_units() {
                if enemy.unit_id() == attacker.unit_id()
                    || !view.match_owner(attacker.side(), enemy, Some(false))
                {
                    continue;
                }
                this.engage(view, evaluator, &reach, enemy);
            }
        }

        debug!(
            target: "battle_ai::targets",
            unit = %this.attacker,
            attacks = this.possible_attacks.len(),
            unreachable = this.unreachable_enemies.len(),
            "targets evaluated"
        );
        this
    }

    /// A compelled attacker strikes `enemy` in melee from `hex` or not at all.
    fn engage_nearest(
        &mut self,
        view: &dyn BattleView,
        evaluator: &dyn AttackEvaluator,
        reach: &Reach<'_>,
        enemy: &'a dyn Unit,
        hex: BattleHex,
    ) {
        let option = reach
            .hexes
            .contains(&hex)
            .then(|| Self::melee(view, evaluator, reach, enemy, hex));
        self.record(enemy, option.into_iter().collect());
    }

    fn engage(
        &mut self,
        view: &dyn BattleView,
        evaluator: &dyn AttackEvaluator,
        reach: &Reach<'_>,
        enemy: &'a dyn Unit,
    ) {
        let options = if view.can_shoot(reach.attacker, enemy.position()) {
            vec![Self::shot(view, evaluator, reach, enemy)]
        } else {
            reach
                .hexes
                .iter()
                .filter(|&&hex| view.is_melee_attack_possible(reach.attacker, enemy, hex))
                .map(|&hex| Self::melee(view, evaluator, reach, enemy, hex))
                .collect()
        };
        self.record(enemy, options);
    }

    fn record(&mut self, enemy: &'a dyn Unit, options: Vec<AttackOption>) {
        if options.is_empty() {
            trace!(target: "battle_ai::targets", enemy = %enemy.unit_id(), "unreachable");
            self.unreachable_enemies.push(enemy);
        }
        self.possible_attacks.extend(options);
    }

    fn shot(
        view: &dyn BattleView,
        evaluator: &dyn AttackEvaluator,
        reach: &Reach<'_>,
        enemy: &dyn Unit,
    ) -> AttackOption {
        let ctx = AttackContext {
            view,
            attacker: reach.attacker,
            defender: enemy,
            shooting: true,
            charged_fields: 0,
        };
        let option = evaluator.evaluate(&ctx, None);
        trace!(
            target: "battle_ai::targets",
            enemy = %enemy.unit_id(),
            score = option.score,
            "shot"
        );
        option
    }

    fn melee(
        view: &dyn BattleView,
        evaluator: &dyn AttackEvaluator,
        reach: &Reach<'_>,
        enemy: &dyn Unit,
        hex: BattleHex,
    ) -> AttackOption {
        let ctx = AttackContext {
            view,
            attacker: reach.attacker,
            defender: enemy,
            shooting: false,
            charged_fields: reach.distances.get(hex).unwrap_or(0),
        };
        let option = evaluator.evaluate(&ctx, Some(hex));
        trace!(
            target: "battle_ai::targets",
            enemy = %enemy.unit_id(),
            hex = hex.index(),
            charged = ctx.charged_fields,
            score = option.score,
            "melee"
        );
        option
    }

    pub fn attacker(&self) -> UnitId {
        self.attacker
    }

    pub fn possible_attacks(&self) -> &[AttackOption] {
        &self.possible_attacks
    }

    pub fn unreachable_enemies(&self) -> &[&'a dyn Unit] {
        &self.unreachable_enemies
    }

    /// The highest scoring attack. Ties go to the option enumerated first.
    pub fn best_action(&self) -> Result<&AttackOption, TargetError> {
        let mut best: Option<&AttackOption> = None;
        for option in &self.possible_attacks {
            if best.is_none_or(|b| option.score > b.score) {
                best = Some(option);
            }
        }
        best.ok_or(TargetError::NoActions(self.attacker))
    }

    /// Score of the best attack, `0` when there is none.
    pub fn best_action_value(&self) -> i64 {
        self.best_action().map_or(0, |option| option.score)
    }
}

impl fmt::Debug for TargetEvaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unreachable: Vec<UnitId> = self
            .unreachable_enemies
            .iter()
            .map(|u| u.unit_id())
            .collect();
        f.debug_struct("TargetEvaluator")
            .field("attacker", &self.attacker)
            .field("possible_attacks", &self.possible_attacks)
            .field("unreachable_enemies", &unreachable)
            .finish()
    }
}

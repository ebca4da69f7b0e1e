use crate::battle::{BattleChange, BattleMutator, ServerCallback};
use crate::bonus::{Bonus, BonusBearer, BonusSource, Selector};
use crate::ids::SpellId;
use crate::rng::RngOracle;
use crate::unit::Unit;

use super::super::mechanics::Mechanics;
use super::super::problem::Problem;
use super::super::spell::Positivity;
use super::super::target::{EffectTarget, Target};
use super::error::EffectsError;
use super::params::{EffectParams, Params};
use super::{EffectOutcome, unit_effect};

/// Removes spell effects from target units, filtered by the positivity of
/// the spell that granted them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispelEffect {
    pub positive: bool,
    pub negative: bool,
    pub neutral: bool,
}

impl DispelEffect {
    pub const NAME: &'static str = "core:dispel";

    pub fn from_params(params: &EffectParams) -> Result<Self, EffectsError> {
        let p = Params::new(Self::NAME, params);
        Ok(Self {
            positive: p.bool("dispelPositive", false)?,
            negative: p.bool("dispelNegative", false)?,
            neutral: p.bool("dispelNeutral", false)?,
        })
    }

    fn dispels(&self, m: &Mechanics<'_>, bonus: &Bonus) -> bool {
        if bonus.source != BonusSource::SpellEffect {
            return false;
        }
        // Effects of spells missing from the catalog stay put.
        match m.catalog.spell(SpellId(bonus.sid)).map(|s| s.positivity) {
            Some(Positivity::Positive) => self.positive,
            Some(Positivity::Negative) => self.negative,
            Some(Positivity::Neutral) => self.neutral,
            None => false,
        }
    }

    fn dispellable(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> Vec<Bonus> {
        unit.bonuses(&Selector::SourceType(BonusSource::SpellEffect))
            .iter()
            .filter(|b| self.dispels(m, b))
            .map(|b| Bonus::clone(b))
            .collect()
    }

    /// A unit is a valid target only while it carries something to dispel.
    pub fn is_valid_target(&self, m: &Mechanics<'_>, unit: &dyn Unit) -> bool {
        unit.is_valid_target(false) && !self.dispellable(m, unit).is_empty()
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
        let mut outcome = EffectOutcome::default();
        let mut changes = Vec::new();
        for unit in unit_effect::units(m, target) {
            let bonuses = self.dispellable(m, unit);
            if bonuses.is_empty() {
                continue;
            }
            outcome.affected.push(unit.unit_id());
            outcome
                .log
                .push(format!("{} dispels {} effects from {}", m.spell_name(), bonuses.len(), unit.unit_id()));
            changes.push(BattleChange::BonusesRemoved {
                unit: unit.unit_id(),
                bonuses,
            });
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
        let (changes, _) = self.changes(m, target);
        battle.apply_all(&changes)
    }
}

use crate::battle::BattleView;
use crate::config::BattleConfig;
use crate::ids::Side;
use crate::unit::Unit;

use super::caster::Caster;
use super::problem::{Problem, ProblemKind};
use super::spell::{Spell, SpellCatalog};

/// How a spell came to be cast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CastMode {
    #[default]
    Hero,
    /// Reflected by magic mirror.
    MagicMirror,
    CreatureActive,
    Enchanter,
    SpellLikeAttack,
    AfterAttack,
    BeforeAttack,
    Passive,
}

impl CastMode {
    /// Casts triggered by something else rather than chosen by the caster.
    pub const fn is_reactive(self) -> bool {
        matches!(
            self,
            Self::MagicMirror | Self::SpellLikeAttack | Self::AfterAttack | Self::BeforeAttack
        )
    }
}

/// Everything an effect needs to know about the cast it is part of.
#[derive(Clone, Copy)]
pub struct Mechanics<'a> {
    pub view: &'a dyn BattleView,
    pub caster: &'a dyn Caster,
    pub spell: &'a Spell,
    pub catalog: &'a dyn SpellCatalog,
    pub mode: CastMode,
    level: usize,
    power: i64,
}

impl<'a> Mechanics<'a> {
    pub fn new(
        view: &'a dyn BattleView,
        caster: &'a dyn Caster,
        spell: &'a Spell,
        catalog: &'a dyn SpellCatalog,
        mode: CastMode,
    ) -> Self {
        Self {
            view,
            caster,
            spell,
            catalog,
            mode,
            level: caster.effect_level(spell).min(BattleConfig::EFFECT_LEVELS - 1),
            power: caster.effect_power(spell),
        }
    }

    /// The same cast reading `view` instead.
    pub fn on<'b>(&self, view: &'b dyn BattleView) -> Mechanics<'b>
    where
        'a: 'b,
    {
        Mechanics {
            view,
            caster: self.caster,
            spell: self.spell,
            catalog: self.catalog,
            mode: self.mode,
            level: self.level,
            power: self.power,
        }
    }

    pub fn with_effect_level(mut self, level: usize) -> Self {
        self.level = level.min(BattleConfig::EFFECT_LEVELS - 1);
        self
    }

    pub fn with_effect_power(mut self, power: i64) -> Self {
        self.power = power;
        self
    }

    pub fn effect_level(&self) -> usize {
        self.level
    }

    pub fn effect_power(&self) -> i64 {
        self.power
    }

    pub fn spell_name(&self) -> &str {
        &self.spell.name
    }

    pub fn caster_side(&self) -> Side {
        self.caster.owner()
    }

    pub fn is_receptive(&self, unit: &dyn Unit) -> bool {
        self.spell
            .target_condition
            .is_receptive(self.view, self.caster, self.spell, unit)
    }

    /// Records `kind` against this spell and returns `false`, for use as the
    /// tail of a failing check.
    pub fn adapt_problem(&self, kind: ProblemKind, problem: &mut Problem) -> bool {
        problem.add(kind, format!("{}: {}", self.spell.name, kind));
        false
    }
}

impl std::fmt::Debug for Mechanics<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mechanics")
            .field("spell", &self.spell.name)
            .field("caster", &self.caster.caster_name())
            .field("mode", &self.mode)
            .field("level", &self.level)
            .field("power", &self.power)
            .finish()
    }
}

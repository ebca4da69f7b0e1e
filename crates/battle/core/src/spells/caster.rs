use crate::config::BattleConfig;
use crate::ids::Side;

use super::spell::Spell;

/// Whoever casts a spell: a hero or a spellcasting unit.
pub trait Caster {
    fn owner(&self) -> Side;

    fn caster_name(&self) -> String;

    /// Effect level (`0..EFFECT_LEVELS`) the caster achieves with `spell`.
    fn effect_level(&self, spell: &Spell) -> usize;

    fn effect_power(&self, spell: &Spell) -> i64;
}

/// Plain caster description: a name, a side, mastery and extra power.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CasterProfile {
    pub name: String,
    pub side: Side,
    pub mastery: usize,
    pub power_bonus: i64,
}

impl CasterProfile {
    pub fn new(name: impl Into<String>, side: Side, mastery: usize) -> Self {
        Self {
            name: name.into(),
            side,
            mastery,
            power_bonus: 0,
        }
    }

    pub fn with_power_bonus(mut self, bonus: i64) -> Self {
        self.power_bonus = bonus;
        self
    }
}

impl Caster for CasterProfile {
    fn owner(&self) -> Side {
        self.side
    }

    fn caster_name(&self) -> String {
        self.name.clone()
    }

    fn effect_level(&self, _spell: &Spell) -> usize {
        self.mastery.min(BattleConfig::EFFECT_LEVELS - 1)
    }

    fn effect_power(&self, spell: &Spell) -> i64 {
        spell.power_at(self.effect_level(spell)) + self.power_bonus
    }
}

use bitflags::bitflags;

use crate::bonus::BonusType;
use crate::config::BattleConfig;
use crate::ids::SpellId;

use super::condition::TargetCondition;
use super::effects::Effects;

/// Whether a spell helps or harms its targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Positivity {
    Positive,
    Negative,
    #[default]
    Neutral,
}

bitflags! {
    /// Magic schools a spell belongs to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpellSchools: u8 {
        const AIR = 1 << 0;
        const FIRE = 1 << 1;
        const WATER = 1 << 2;
        const EARTH = 1 << 3;
    }
}

impl SpellSchools {
    /// Immunity bonus of each school in the set, in school order.
    pub fn immunity_bonuses(self) -> impl Iterator<Item = BonusType> {
        [
            (Self::AIR, BonusType::AirImmunity),
            (Self::FIRE, BonusType::FireImmunity),
            (Self::WATER, BonusType::WaterImmunity),
            (Self::EARTH, BonusType::EarthImmunity),
        ]
        .into_iter()
        .filter(move |(school, _)| self.contains(*school))
        .map(|(_, bonus)| bonus)
    }
}

/// A loaded spell definition.
#[derive(Clone, Debug)]
pub struct Spell {
    pub id: SpellId,
    pub name: String,
    /// Spell tier, 0 for abilities outside the tier system.
    pub level: i32,
    pub positivity: Positivity,
    pub damage: bool,
    pub schools: SpellSchools,
    /// Base effect power per effect level.
    pub level_power: [i64; BattleConfig::EFFECT_LEVELS],
    pub target_condition: TargetCondition,
    pub effects: Effects,
}

impl Spell {
    pub fn new(id: SpellId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: 0,
            positivity: Positivity::Neutral,
            damage: false,
            schools: SpellSchools::empty(),
            level_power: [0; BattleConfig::EFFECT_LEVELS],
            target_condition: TargetCondition::default(),
            effects: Effects::default(),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.positivity == Positivity::Positive
    }

    pub fn is_negative(&self) -> bool {
        self.positivity == Positivity::Negative
    }

    pub fn is_damage_spell(&self) -> bool {
        self.damage
    }

    pub fn power_at(&self, level: usize) -> i64 {
        self.level_power.get(level).copied().unwrap_or(0)
    }
}

/// Spell lookup by id.
pub trait SpellCatalog {
    fn spell(&self, id: SpellId) -> Option<&Spell>;
}

impl SpellCatalog for Vec<Spell> {
    fn spell(&self, id: SpellId) -> Option<&Spell> {
        self.iter().find(|s| s.id == id)
    }
}

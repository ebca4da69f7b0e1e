//! Bonus classification enums.

use bitflags::bitflags;

/// What a bonus does.
///
/// Names serialize as `SCREAMING_SNAKE_CASE`; content refers to bonus types by
/// these names (e.g. `bonus.UNDEAD` in spell target conditions).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusType {
    // ========================================================================
    // Stats
    // ========================================================================
    /// Maximum health of a single creature of the stack.
    StackHealth,
    Speed,
    /// Subtype 0 = attack, 1 = defense.
    PrimarySkill,
    /// Subtype 1 = minimum damage, 2 = maximum damage.
    CreatureDamage,

    // ========================================================================
    // Combat abilities
    // ========================================================================
    Shooter,
    Flying,
    /// Shoots even when an enemy stands adjacent.
    FreeShooting,
    NoMeleePenalty,
    NoDistancePenalty,
    /// Charge damage bonus per travelled hex.
    Jousting,
    NoRetaliation,
    BlocksRetaliation,

    // ========================================================================
    // Control
    // ========================================================================
    /// Compulsion: the unit must attack the nearest creature (berserk).
    AttacksNearestCreature,
    /// The unit fights for the opposing side while this bonus lasts.
    Hypnotized,

    // ========================================================================
    // Spell immunities
    // ========================================================================
    /// Immune to spells of level <= value.
    LevelSpellImmunity,
    /// Subtype = spell id; additional info 1 marks absolute immunity.
    SpellImmunity,
    /// Accepts every positive spell, overriding immunities.
    Receptive,
    /// Subtype 0 = battle-wide (commanding hero), 1 = carried equipment.
    NegateAllNaturalImmunities,
    /// Subtype 0 = all spells, 1 = non-positive spells, 2 = damage spells.
    AirImmunity,
    FireImmunity,
    WaterImmunity,
    EarthImmunity,

    // ========================================================================
    // Creature nature
    // ========================================================================
    Undead,
    NonLiving,
    SiegeWeapon,
}

/// Where a bonus comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusSource {
    Artifact,
    Creature,
    /// Granted by a spell; `sid` is the spell id.
    SpellEffect,
    SecondarySkill,
    Hero,
    Terrain,
    Other,
}

/// How a bonus value combines with others of the same selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueType {
    /// Summed first.
    BaseNumber,
    /// Summed onto the base.
    #[default]
    Additive,
    /// Percentage increase of (base + additive), summed then multiplied.
    PercentToBase,
}

/// Which attacks a bonus participates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectRange {
    #[default]
    NoLimit,
    OnlyDistanceFight,
    OnlyMeleeFight,
}

bitflags! {
    /// When a bonus expires.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BonusDuration: u16 {
        const PERMANENT = 1;
        const ONE_BATTLE = 1 << 1;
        const ONE_DAY = 1 << 2;
        /// Expires when `turns_remain` reaches zero.
        const N_TURNS = 1 << 3;
        const UNTIL_BEING_ATTACKED = 1 << 4;
        const UNTIL_ATTACK = 1 << 5;
    }
}

impl Default for BonusDuration {
    fn default() -> Self {
        Self::PERMANENT
    }
}

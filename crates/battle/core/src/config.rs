/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Extra melee damage per hex travelled before the attack, in percent,
    /// for units with the `Jousting` bonus.
    pub charge_bonus_percent: u32,

    /// How much the AI weighs damage it would take from retaliation against
    /// damage it deals, in percent.
    pub retaliation_weight_percent: u32,

    /// Damage change per point of attack/defense difference, in percent.
    pub attack_defense_step_percent: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const FIELD_WIDTH: usize = 17;
    pub const FIELD_HEIGHT: usize = 11;
    pub const FIELD_SIZE: usize = Self::FIELD_WIDTH * Self::FIELD_HEIGHT;
    /// Number of spell power tiers (none, basic, advanced, expert).
    pub const EFFECT_LEVELS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CHARGE_BONUS_PERCENT: u32 = 5;
    pub const DEFAULT_RETALIATION_WEIGHT_PERCENT: u32 = 100;
    pub const DEFAULT_ATTACK_DEFENSE_STEP_PERCENT: u32 = 5;

    pub fn new() -> Self {
        Self {
            charge_bonus_percent: Self::DEFAULT_CHARGE_BONUS_PERCENT,
            retaliation_weight_percent: Self::DEFAULT_RETALIATION_WEIGHT_PERCENT,
            attack_defense_step_percent: Self::DEFAULT_ATTACK_DEFENSE_STEP_PERCENT,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

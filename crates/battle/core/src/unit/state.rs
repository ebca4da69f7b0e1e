use crate::hex::BattleHex;
use crate::ids::{CreatureId, Side, UnitId};

use super::health::UnitHealth;

/// Mutable snapshot of a combatant, everything except its bonuses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub creature: CreatureId,
    pub side: Side,
    pub position: BattleHex,
    pub health: UnitHealth,
    /// Stack size at the start of the battle.
    pub base_count: u32,
    pub shots: u32,
    pub ghost: bool,
    pub summoned: bool,
    pub defending: bool,
}

impl UnitState {
    pub fn new(
        id: UnitId,
        creature: CreatureId,
        side: Side,
        position: BattleHex,
        count: u32,
        max_health: u32,
    ) -> Self {
        Self {
            id,
            creature,
            side,
            position,
            health: UnitHealth::full(count, max_health),
            base_count: count,
            shots: 0,
            ghost: false,
            summoned: false,
            defending: false,
        }
    }

    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }
}

use crate::bonus::Bonus;
use crate::error::BattleError;
use crate::hex::BattleHex;
use crate::ids::{ObstacleId, SpellId, UnitId};
use crate::unit::{UnitHealth, UnitState};

use super::obstacle::Obstacle;

/// Typed change records shared by the transport and in-memory paths.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleChange {
    StackAttacked {
        attacker: Option<UnitId>,
        defender: UnitId,
        damage: u64,
        killed: u32,
        /// Defender health after the hit.
        health: UnitHealth,
        spell: Option<SpellId>,
    },
    StackMoved {
        unit: UnitId,
        tiles: Vec<BattleHex>,
        /// `None` for teleports.
        distance: Option<u32>,
        teleporting: bool,
    },
    /// Full snapshot of a unit's mutable fields.
    UnitChanged(UnitState),
    BonusesAdded {
        unit: UnitId,
        bonuses: Vec<Bonus>,
    },
    BonusesUpdated {
        unit: UnitId,
        bonuses: Vec<Bonus>,
    },
    BonusesRemoved {
        unit: UnitId,
        bonuses: Vec<Bonus>,
    },
    ObstacleAdded(Obstacle),
    ObstacleRemoved(ObstacleId),
}

impl BattleChange {
    /// The unit the record is about, if any.
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Self::StackAttacked { defender, .. } => Some(*defender),
            Self::StackMoved { unit, .. }
            | Self::BonusesAdded { unit, .. }
            | Self::BonusesUpdated { unit, .. }
            | Self::BonusesRemoved { unit, .. } => Some(*unit),
            Self::UnitChanged(state) => Some(state.id),
            Self::ObstacleAdded(_) | Self::ObstacleRemoved(_) => None,
        }
    }
}

/// Applies change records to a battle.
pub trait BattleMutator {
    type Error: BattleError + std::error::Error;

    fn apply_change(&mut self, change: &BattleChange) -> Result<(), Self::Error>;

    fn apply_all(&mut self, changes: &[BattleChange]) -> Result<(), Self::Error> {
        changes.iter().try_for_each(|c| self.apply_change(c))
    }
}

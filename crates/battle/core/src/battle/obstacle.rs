use crate::hex::BattleHex;
use crate::ids::{ObstacleId, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ObstacleKind {
    /// Terrain placed before the battle.
    Terrain,
    FireWall,
    ForceField,
    LandMine,
    Quicksand,
}

/// An obstacle on the battlefield, terrain or spell-created.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub hexes: Vec<BattleHex>,
    pub caster_side: Option<Side>,
    /// `None` for obstacles that never expire.
    pub turns_remaining: Option<u32>,
    pub damage: i32,
    /// Invisible to the side that did not create it.
    pub hidden: bool,
    pub passable: bool,
    /// Stops movement of units entering it.
    pub trap: bool,
}

impl Obstacle {
    pub fn terrain(id: ObstacleId, hexes: Vec<BattleHex>) -> Self {
        Self {
            id,
            kind: ObstacleKind::Terrain,
            hexes,
            caster_side: None,
            turns_remaining: None,
            damage: 0,
            hidden: false,
            passable: false,
            trap: false,
        }
    }

    pub fn covers(&self, hex: BattleHex) -> bool {
        self.hexes.contains(&hex)
    }

    pub fn blocks_movement(&self) -> bool {
        !self.passable
    }
}

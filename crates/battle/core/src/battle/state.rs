use tracing::trace;

use crate::bonus::{Bonus, BonusSource, BonusType, Selector, ValueType};
use crate::config::BattleConfig;
use crate::hex::BattleHex;
use crate::ids::{CreatureId, ObstacleId, Side, UnitId};
use crate::unit::{Combatant, Unit, UnitState};

use super::changes::{BattleChange, BattleMutator};
use super::error::BattleStateError;
use super::obstacle::Obstacle;
use super::view::BattleView;

/// Authoritative in-memory battlefield.
#[derive(Clone, Debug, Default)]
pub struct BattleState {
    pub config: BattleConfig,
    units: Vec<Combatant>,
    obstacles: Vec<Obstacle>,
}

impl BattleState {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            units: Vec::new(),
            obstacles: Vec::new(),
        }
    }

    pub fn builder() -> BattleStateBuilder {
        BattleStateBuilder::default()
    }

    pub fn add_unit(&mut self, unit: Combatant) {
        self.units.push(unit);
    }

    pub fn combatant(&self, id: UnitId) -> Option<&Combatant> {
        self.units.iter().find(|u| u.state.id == id)
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.units
    }

    fn combatant_mut(&mut self, id: UnitId) -> Result<&mut Combatant, BattleStateError> {
        self.units
            .iter_mut()
            .find(|u| u.state.id == id)
            .ok_or(BattleStateError::UnknownUnit(id))
    }

    /// Next free obstacle id.
    pub fn next_obstacle_id(&self) -> ObstacleId {
        ObstacleId(self.obstacles.iter().map(|o| o.id.0 + 1).max().unwrap_or(0))
    }
}

impl BattleView for BattleState {
    fn units_if(&self, pred: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit> {
        self.units
            .iter()
            .map(|u| u as &dyn Unit)
            .filter(|u| !u.is_ghost() && pred(*u))
            .collect()
    }

    fn obstacles(&self) -> Vec<&Obstacle> {
        self.obstacles.iter().collect()
    }
}

impl BattleMutator for BattleState {
    type Error = BattleStateError;

    fn apply_change(&mut self, change: &BattleChange) -> Result<(), BattleStateError> {
        trace!(target: "battle_core::battle", ?change, "applying change");
        match change {
            BattleChange::ObstacleAdded(obstacle) => {
                if self.obstacles.iter().any(|o| o.id == obstacle.id) {
                    return Err(BattleStateError::DuplicateObstacle(obstacle.id));
                }
                self.obstacles.push(obstacle.clone());
            }
            BattleChange::ObstacleRemoved(id) => {
                let before = self.obstacles.len();
                self.obstacles.retain(|o| o.id != *id);
                if self.obstacles.len() == before {
                    return Err(BattleStateError::UnknownObstacle(*id));
                }
            }
            _ => {
                if let Some(id) = change.unit() {
                    apply_unit_change(self.combatant_mut(id)?, change);
                }
            }
        }
        Ok(())
    }
}

/// Applies a unit-scoped record to `unit`. Obstacle records are ignored.
pub(super) fn apply_unit_change(unit: &mut Combatant, change: &BattleChange) {
    match change {
        BattleChange::StackAttacked { health, .. } => {
            unit.state.health = *health;
        }
        BattleChange::StackMoved { tiles, .. } => {
            if let Some(&destination) = tiles.last() {
                unit.state.position = destination;
            }
        }
        BattleChange::UnitChanged(state) => {
            unit.state = state.clone();
        }
        BattleChange::BonusesAdded { bonuses, .. } => {
            for bonus in bonuses {
                unit.bonuses.add(bonus.clone());
            }
        }
        BattleChange::BonusesUpdated { bonuses, .. } => {
            for bonus in bonuses {
                unit.bonuses.update(bonus.clone());
            }
        }
        BattleChange::BonusesRemoved { bonuses, .. } => {
            for bonus in bonuses {
                unit.bonuses.remove_matching(&Selector::identity_of(bonus));
            }
        }
        BattleChange::ObstacleAdded(_) | BattleChange::ObstacleRemoved(_) => {}
    }
}

/// Fixture-style builder for battlefields.
///
/// Units get sequential ids starting at 0 in the order they are added. Every
/// unit receives `StackHealth` and `Speed` creature bonuses from the values
/// given here; further bonuses go through [`BattleStateBuilder::bonus`].
#[derive(Debug, Default)]
pub struct BattleStateBuilder {
    config: BattleConfig,
    units: Vec<Combatant>,
    obstacles: Vec<Obstacle>,
}

impl BattleStateBuilder {
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a stack of `count` creatures with `max_health` each.
    pub fn unit(
        mut self,
        creature: CreatureId,
        side: Side,
        position: BattleHex,
        count: u32,
        max_health: u32,
        speed: u32,
    ) -> Self {
        let id = UnitId(self.units.len() as u32);
        let state = UnitState::new(id, creature, side, position, count, max_health);
        let unit = Combatant::new(state)
            .with_bonus(Self::creature_bonus(BonusType::StackHealth, max_health as i32))
            .with_bonus(Self::creature_bonus(BonusType::Speed, speed as i32));
        self.units.push(unit);
        self
    }

    /// Adds `bonus` to the most recently added unit.
    pub fn bonus(mut self, bonus: Bonus) -> Self {
        if let Some(unit) = self.units.last_mut() {
            unit.bonuses.add(bonus);
        }
        self
    }

    /// Gives the most recently added unit a ranged attack with `shots` ammo.
    pub fn shooter(mut self, shots: u32) -> Self {
        if let Some(unit) = self.units.last_mut() {
            unit.state.shots = shots;
            unit.bonuses.add(Self::creature_bonus(BonusType::Shooter, 0));
        }
        self
    }

    pub fn obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn build(self) -> BattleState {
        BattleState {
            config: self.config,
            units: self.units,
            obstacles: self.obstacles,
        }
    }

    fn creature_bonus(kind: BonusType, val: i32) -> Bonus {
        Bonus::new(kind, BonusSource::Creature, val, 0)
            .with_value_type(ValueType::BaseNumber)
    }
}

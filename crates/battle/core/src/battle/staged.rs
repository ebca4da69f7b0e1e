use crate::ids::{ObstacleId, UnitId};
use crate::unit::{Combatant, Unit};

use super::changes::{BattleChange, BattleMutator};
use super::error::BattleStateError;
use super::obstacle::Obstacle;
use super::state::apply_unit_change;
use super::view::BattleView;

/// A battle with pending changes layered over a read-only base.
///
/// Touched units are copied on first change; everything else is read through.
/// A cast stages each effect's changes here so the next effect sees them.
pub struct StagedBattle<'a> {
    base: &'a dyn BattleView,
    units: Vec<Combatant>,
    obstacles_added: Vec<Obstacle>,
    obstacles_removed: Vec<ObstacleId>,
}

impl<'a> StagedBattle<'a> {
    pub fn new(base: &'a dyn BattleView) -> Self {
        Self {
            base,
            units: Vec::new(),
            obstacles_added: Vec::new(),
            obstacles_removed: Vec::new(),
        }
    }

    pub fn is_pristine(&self) -> bool {
        self.units.is_empty() && self.obstacles_added.is_empty() && self.obstacles_removed.is_empty()
    }

    fn staged(&self, id: UnitId) -> Option<&Combatant> {
        self.units.iter().find(|u| u.state.id == id)
    }

    fn staged_mut(&mut self, id: UnitId) -> Result<&mut Combatant, BattleStateError> {
        let index = match self.units.iter().position(|u| u.state.id == id) {
            Some(index) => index,
            None => {
                let unit = self
                    .base
                    .units_if(&|u| u.unit_id() == id)
                    .into_iter()
                    .next()
                    .ok_or(BattleStateError::UnknownUnit(id))?;
                self.units.push(Combatant::snapshot(unit));
                self.units.len() - 1
            }
        };
        Ok(&mut self.units[index])
    }
}

impl BattleView for StagedBattle<'_> {
    fn units_if(&self, pred: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit> {
        self.base
            .units_if(&|_| true)
            .into_iter()
            .map(|u| match self.staged(u.unit_id()) {
                Some(staged) => staged as &dyn Unit,
                None => u,
            })
            .filter(|u| !u.is_ghost() && pred(*u))
            .collect()
    }

    fn obstacles(&self) -> Vec<&Obstacle> {
        self.base
            .obstacles()
            .into_iter()
            .filter(|o| !self.obstacles_removed.contains(&o.id))
            .chain(self.obstacles_added.iter())
            .collect()
    }
}

impl BattleMutator for StagedBattle<'_> {
    type Error = BattleStateError;

    fn apply_change(&mut self, change: &BattleChange) -> Result<(), BattleStateError> {
        match change {
            BattleChange::ObstacleAdded(obstacle) => {
                if self.obstacles().iter().any(|o| o.id == obstacle.id) {
                    return Err(BattleStateError::DuplicateObstacle(obstacle.id));
                }
                self.obstacles_added.push(obstacle.clone());
            }
            BattleChange::ObstacleRemoved(id) => {
                if let Some(index) = self.obstacles_added.iter().position(|o| o.id == *id) {
                    self.obstacles_added.remove(index);
                } else if self.obstacles().iter().any(|o| o.id == *id) {
                    self.obstacles_removed.push(*id);
                } else {
                    return Err(BattleStateError::UnknownObstacle(*id));
                }
            }
            _ => {
                if let Some(id) = change.unit() {
                    apply_unit_change(self.staged_mut(id)?, change);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for StagedBattle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedBattle")
            .field("units", &self.units.len())
            .field("obstacles_added", &self.obstacles_added.len())
            .field("obstacles_removed", &self.obstacles_removed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleState;
    use crate::hex::BattleHex;
    use crate::ids::{CreatureId, Side};
    use crate::unit::UnitHealth;

    fn battle() -> BattleState {
        BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(2, 5), 10, 10, 5)
            .unit(CreatureId(2), Side::Defender, BattleHex::from_xy(12, 5), 10, 10, 5)
            .build()
    }

    fn hit(defender: UnitId, health: UnitHealth) -> BattleChange {
        BattleChange::StackAttacked {
            attacker: None,
            defender,
            damage: 0,
            killed: 0,
            health,
            spell: None,
        }
    }

    #[test]
    fn staged_changes_shadow_the_base() {
        let real = battle();
        let mut staged = StagedBattle::new(&real);
        assert!(staged.is_pristine());

        staged.apply_change(&hit(UnitId(1), UnitHealth::full(4, 10))).unwrap();
        assert_eq!(staged.unit(UnitId(1)).unwrap().count(), 4);
        assert_eq!(staged.unit(UnitId(0)).unwrap().count(), 10);
        assert_eq!(real.unit(UnitId(1)).unwrap().count(), 10);
        assert_eq!(staged.alive_units().len(), 2);
    }

    #[test]
    fn obstacles_are_staged_and_checked() {
        let real = battle();
        let mut staged = StagedBattle::new(&real);
        let wall = Obstacle::terrain(ObstacleId(0), vec![BattleHex::from_xy(6, 5)]);

        staged.apply_change(&BattleChange::ObstacleAdded(wall.clone())).unwrap();
        assert_eq!(staged.obstacles().len(), 1);
        assert!(real.obstacles().is_empty());
        assert_eq!(
            staged.apply_change(&BattleChange::ObstacleAdded(wall)),
            Err(BattleStateError::DuplicateObstacle(ObstacleId(0)))
        );

        staged.apply_change(&BattleChange::ObstacleRemoved(ObstacleId(0))).unwrap();
        assert!(staged.obstacles().is_empty());
        assert_eq!(
            staged.apply_change(&BattleChange::ObstacleRemoved(ObstacleId(0))),
            Err(BattleStateError::UnknownObstacle(ObstacleId(0)))
        );
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let real = battle();
        let mut staged = StagedBattle::new(&real);
        assert_eq!(
            staged.apply_change(&hit(UnitId(7), UnitHealth::default())),
            Err(BattleStateError::UnknownUnit(UnitId(7)))
        );
    }
}

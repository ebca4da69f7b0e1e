//! Look-ahead battlefield.
//!
//! [`HypotheticState`] answers every [`BattleView`] query of the real battle,
//! except that units written to during the simulation are replaced by a
//! [`UnitOverlay`]: a copied [`UnitState`] plus a [`BonusOverlay`] over the
//! real unit's bonuses. Overlays are created on the first write to a unit and
//! reused afterwards; units never written to are served straight from the real
//! battle.
//!
//! One state belongs to one simulated decision. Branches of a search each
//! build their own.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use battle_core::{
    BattleChange, BattleMutator, BattleView, Bonus, BonusBearer, BonusList, Obstacle, ObstacleId,
    Selector, Unit, UnitId, UnitState,
};
use tracing::trace;

use crate::error::HypotheticError;
use crate::overlay::BonusOverlay;

/// A unit as seen by the simulation.
#[derive(Clone)]
pub struct UnitOverlay<'a> {
    state: UnitState,
    bonuses: BonusOverlay<'a>,
}

impl<'a> UnitOverlay<'a> {
    /// Seeds an overlay from the unit's current state and bonuses.
    pub fn of(unit: &'a dyn Unit) -> Self {
        Self {
            state: unit.state().clone(),
            bonuses: BonusOverlay::new(unit),
        }
    }

    pub fn state_mut(&mut self) -> &mut UnitState {
        &mut self.state
    }

    pub fn bonus_overlay(&self) -> &BonusOverlay<'a> {
        &self.bonuses
    }

    pub fn bonus_overlay_mut(&mut self) -> &mut BonusOverlay<'a> {
        &mut self.bonuses
    }
}

impl BonusBearer for UnitOverlay<'_> {
    fn all_bonuses(&self, selector: &Selector, limit: Option<&Selector>) -> BonusList {
        self.bonuses.all_bonuses(selector, limit)
    }
}

impl Unit for UnitOverlay<'_> {
    fn state(&self) -> &UnitState {
        &self.state
    }
}

impl fmt::Debug for UnitOverlay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOverlay")
            .field("state", &self.state)
            .field("bonuses", &self.bonuses)
            .finish()
    }
}

pub struct HypotheticState<'a> {
    real: &'a dyn BattleView,
    overlays: HashMap<UnitId, UnitOverlay<'a>>,
    obstacles_added: Vec<Obstacle>,
    obstacles_removed: Vec<ObstacleId>,
}

impl<'a> HypotheticState<'a> {
    pub fn new(real: &'a dyn BattleView) -> Self {
        Self {
            real,
            overlays: HashMap::new(),
            obstacles_added: Vec::new(),
            obstacles_removed: Vec::new(),
        }
    }

    /// The overlay of `id`, created from the real unit on first use.
    ///
    /// Asking for a unit the real battle does not have is a caller bug and
    /// yields [`HypotheticError::UnknownUnit`].
    pub fn overlay(&mut self, id: UnitId) -> Result<&mut UnitOverlay<'a>, HypotheticError> {
        let real = self.real;
        match self.overlays.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let unit = real.unit(id).ok_or(HypotheticError::UnknownUnit(id))?;
                trace!(target: "battle_ai::hypothetic", unit = %id, "materializing overlay");
                Ok(entry.insert(UnitOverlay::of(unit)))
            }
        }
    }

    /// The overlay of `id` if one has been materialized.
    pub fn peek(&self, id: UnitId) -> Option<&UnitOverlay<'a>> {
        self.overlays.get(&id)
    }

    pub fn is_materialized(&self, id: UnitId) -> bool {
        self.overlays.contains_key(&id)
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn add_bonus(&mut self, id: UnitId, bonuses: &[Bonus]) -> Result<(), HypotheticError> {
        self.overlay(id)?.bonuses.add(bonuses);
        Ok(())
    }

    pub fn update_bonus(&mut self, id: UnitId, bonuses: &[Bonus]) -> Result<(), HypotheticError> {
        self.overlay(id)?.bonuses.update(bonuses);
        Ok(())
    }

    pub fn remove_bonus(&mut self, id: UnitId, bonuses: &[Bonus]) -> Result<(), HypotheticError> {
        self.overlay(id)?.bonuses.remove(bonuses);
        Ok(())
    }

    fn has_obstacle(&self, id: ObstacleId) -> bool {
        self.obstacles().iter().any(|o| o.id == id)
    }
}

impl BattleView for HypotheticState<'_> {
    fn units_if(&self, pred: &dyn Fn(&dyn Unit) -> bool) -> Vec<&dyn Unit> {
        self.real
            .units_if(&|_| true)
            .into_iter()
            .map(|real| match self.overlays.get(&real.unit_id()) {
                Some(overlay) => overlay as &dyn Unit,
                None => real,
            })
            .filter(|u| !u.is_ghost() && pred(*u))
            .collect()
    }

    fn obstacles(&self) -> Vec<&Obstacle> {
        self.real
            .obstacles()
            .into_iter()
            .filter(|o| !self.obstacles_removed.contains(&o.id))
            .chain(self.obstacles_added.iter())
            .collect()
    }
}

impl BattleMutator for HypotheticState<'_> {
    type Error = HypotheticError;

    fn apply_change(&mut self, change: &BattleChange) -> Result<(), HypotheticError> {
        trace!(target: "battle_ai::hypothetic", ?change, "applying hypothetical change");
        match change {
            BattleChange::StackAttacked {
                defender, health, ..
            } => {
                self.overlay(*defender)?.state.health = *health;
            }
            BattleChange::StackMoved { unit, tiles, .. } => {
                let overlay = self.overlay(*unit)?;
                if let Some(&destination) = tiles.last() {
                    overlay.state.position = destination;
                }
            }
            BattleChange::UnitChanged(state) => {
                self.overlay(state.id)?.state = state.clone();
            }
            BattleChange::BonusesAdded { unit, bonuses } => self.add_bonus(*unit, bonuses)?,
            BattleChange::BonusesUpdated { unit, bonuses } => self.update_bonus(*unit, bonuses)?,
            BattleChange::BonusesRemoved { unit, bonuses } => self.remove_bonus(*unit, bonuses)?,
            BattleChange::ObstacleAdded(obstacle) => {
                if self.has_obstacle(obstacle.id) {
                    return Err(HypotheticError::DuplicateObstacle(obstacle.id));
                }
                self.obstacles_added.push(obstacle.clone());
            }
            BattleChange::ObstacleRemoved(id) => {
                if let Some(index) = self.obstacles_added.iter().position(|o| o.id == *id) {
                    self.obstacles_added.remove(index);
                } else if self.has_obstacle(*id) {
                    self.obstacles_removed.push(*id);
                } else {
                    return Err(HypotheticError::UnknownObstacle(*id));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for HypotheticState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HypotheticState")
            .field("overlays", &self.overlays)
            .field("obstacles_added", &self.obstacles_added)
            .field("obstacles_removed", &self.obstacles_removed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{
        BattleHex, BattleState, BonusType, CreatureId, ObstacleKind, Side, SpellId, UnitHealth,
    };

    fn battle() -> BattleState {
        BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(2, 5), 10, 10, 5)
            .unit(CreatureId(2), Side::Defender, BattleHex::from_xy(12, 5), 4, 30, 4)
            .bonus(Bonus::spell_effect(BonusType::Speed, SpellId(54), -2, 2))
            .build()
    }

    fn wall(id: u32, x: i16, y: i16) -> Obstacle {
        Obstacle {
            kind: ObstacleKind::ForceField,
            ..Obstacle::terrain(ObstacleId(id), vec![BattleHex::from_xy(x, y)])
        }
    }

    #[test]
    fn reads_do_not_materialize_overlays() {
        let real = battle();
        let state = HypotheticState::new(&real);

        let unit = state.unit(UnitId(1)).unwrap();
        assert_eq!(unit.state(), real.unit(UnitId(1)).unwrap().state());
        assert_eq!(unit.speed(), 2);
        assert_eq!(state.alive_units().len(), 2);
        assert_eq!(state.overlay_count(), 0);
    }

    #[test]
    fn unknown_unit_is_fatal() {
        let real = battle();
        let mut state = HypotheticState::new(&real);
        let err = state.add_bonus(UnitId(7), &[]).unwrap_err();
        assert_eq!(err, HypotheticError::UnknownUnit(UnitId(7)));
        assert_eq!(state.overlay_count(), 0);
    }

    #[test]
    fn writes_go_through_one_overlay() {
        let real = battle();
        let mut state = HypotheticState::new(&real);
        state
            .remove_bonus(UnitId(1), &[Bonus::spell_effect(BonusType::Speed, SpellId(54), -2, 0)])
            .unwrap();
        state
            .apply_change(&BattleChange::StackMoved {
                unit: UnitId(1),
                tiles: vec![BattleHex::from_xy(10, 5)],
                distance: Some(2),
                teleporting: false,
            })
            .unwrap();

        assert!(state.is_materialized(UnitId(1)));
        assert!(!state.is_materialized(UnitId(0)));
        assert_eq!(state.overlay_count(), 1);

        let unit = state.unit(UnitId(1)).unwrap();
        assert_eq!(unit.speed(), 4);
        assert_eq!(unit.position(), BattleHex::from_xy(10, 5));
        assert_eq!(state.unit_at(BattleHex::from_xy(10, 5)).map(|u| u.unit_id()), Some(UnitId(1)));

        let original = real.unit(UnitId(1)).unwrap();
        assert_eq!(original.speed(), 2);
        assert_eq!(original.position(), BattleHex::from_xy(12, 5));
    }

    #[test]
    fn killed_units_drop_out_of_alive_listing() {
        let real = battle();
        let mut state = HypotheticState::new(&real);
        state
            .apply_change(&BattleChange::StackAttacked {
                attacker: Some(UnitId(0)),
                defender: UnitId(1),
                damage: 120,
                killed: 4,
                health: UnitHealth::default(),
                spell: None,
            })
            .unwrap();

        assert_eq!(state.alive_units().len(), 1);
        assert!(state.unit(UnitId(1)).unwrap().is_dead());
        assert!(real.unit(UnitId(1)).unwrap().alive());
    }

    #[test]
    fn ghosts_are_never_listed() {
        let real = battle();
        let mut state = HypotheticState::new(&real);
        let mut ghost = real.unit(UnitId(0)).unwrap().state().clone();
        ghost.ghost = true;
        state.apply_change(&BattleChange::UnitChanged(ghost)).unwrap();

        assert!(state.unit(UnitId(0)).is_none());
        assert_eq!(state.units_if(&|_| true).len(), 1);
    }

    #[test]
    fn obstacles_are_layered() {
        let real = BattleState::builder()
            .unit(CreatureId(1), Side::Attacker, BattleHex::from_xy(2, 5), 10, 10, 5)
            .obstacle(wall(0, 4, 5))
            .build();
        let mut state = HypotheticState::new(&real);

        state.apply_change(&BattleChange::ObstacleAdded(wall(1, 6, 5))).unwrap();
        state.apply_change(&BattleChange::ObstacleRemoved(ObstacleId(0))).unwrap();
        let ids: Vec<_> = state.obstacles().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![ObstacleId(1)]);
        assert_eq!(real.obstacles().len(), 1);

        assert_eq!(
            state.apply_change(&BattleChange::ObstacleAdded(wall(1, 7, 5))),
            Err(HypotheticError::DuplicateObstacle(ObstacleId(1)))
        );
        assert_eq!(
            state.apply_change(&BattleChange::ObstacleRemoved(ObstacleId(0))),
            Err(HypotheticError::UnknownObstacle(ObstacleId(0)))
        );
        state.apply_change(&BattleChange::ObstacleRemoved(ObstacleId(1))).unwrap();
        assert!(state.obstacles().is_empty());
    }
}

use crate::bonus::{Bonus, BonusBearer, BonusList, BonusSet, Selector};

use super::Unit;
use super::state::UnitState;

/// A unit as stored by the authoritative battle: state plus owned bonuses.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub state: UnitState,
    pub bonuses: BonusSet,
}

impl Combatant {
    pub fn new(state: UnitState) -> Self {
        Self {
            state,
            bonuses: BonusSet::new(),
        }
    }

    /// Owned copy of any unit: its state and every bonus it carries.
    pub fn snapshot(unit: &dyn Unit) -> Self {
        Self {
            state: unit.state().clone(),
            bonuses: unit.bonuses(&Selector::All).into_iter().collect(),
        }
    }

    pub fn with_bonus(mut self, bonus: Bonus) -> Self {
        self.bonuses.add(bonus);
        self
    }
}

impl BonusBearer for Combatant {
    fn all_bonuses(&self, selector: &Selector, limit: Option<&Selector>) -> BonusList {
        self.bonuses.all_bonuses(selector, limit)
    }
}

impl Unit for Combatant {
    fn state(&self) -> &UnitState {
        &self.state
    }
}

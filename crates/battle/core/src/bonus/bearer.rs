use std::sync::Arc;

use super::bonus::Bonus;
use super::kinds::BonusType;
use super::list::BonusList;
use super::selector::Selector;

/// Anything that carries queryable bonuses.
pub trait BonusBearer {
    /// Bonuses matching `selector`, excluding those matching `limit`.
    fn all_bonuses(&self, selector: &Selector, limit: Option<&Selector>) -> BonusList;

    fn bonuses(&self, selector: &Selector) -> BonusList {
        self.all_bonuses(selector, None)
    }

    fn has_bonus(&self, selector: &Selector) -> bool {
        !self.bonuses(selector).is_empty()
    }

    fn has_bonus_of_type(&self, kind: BonusType) -> bool {
        self.has_bonus(&Selector::Type(kind))
    }

    fn has_bonus_of_type_subtype(&self, kind: BonusType, subtype: i32) -> bool {
        self.has_bonus(&Selector::TypeSubtype(kind, subtype))
    }

    fn value_of(&self, selector: &Selector) -> i32 {
        self.bonuses(selector).total_value()
    }

    fn value_of_type(&self, kind: BonusType) -> i32 {
        self.value_of(&Selector::Type(kind))
    }
}

/// Owned bonus storage of a real unit.
#[derive(Clone, Debug, Default)]
pub struct BonusSet {
    bonuses: Vec<Arc<Bonus>>,
}

impl BonusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(Arc::new(bonus));
    }

    /// Merges a spell-effect update: an existing bonus of the same spell,
    /// type and subtype keeps the longer remaining duration; otherwise the
    /// bonus is added.
    pub fn update(&mut self, bonus: Bonus) {
        let mut merged = false;
        for existing in self.bonuses.iter_mut().filter(|b| b.same_spell_effect(&bonus)) {
            if bonus.turns_remain > existing.turns_remain {
                Arc::make_mut(existing).turns_remain = bonus.turns_remain;
            }
            merged = true;
        }
        if !merged {
            self.add(bonus);
        }
    }

    /// Removes every bonus matching `selector`, returning how many were removed.
    pub fn remove_matching(&mut self, selector: &Selector) -> usize {
        let before = self.bonuses.len();
        self.bonuses.retain(|b| !selector.matches(b));
        before - self.bonuses.len()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Bonus>> {
        self.bonuses.iter()
    }
}

impl FromIterator<Bonus> for BonusSet {
    fn from_iter<T: IntoIterator<Item = Bonus>>(iter: T) -> Self {
        Self {
            bonuses: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl FromIterator<Arc<Bonus>> for BonusSet {
    fn from_iter<T: IntoIterator<Item = Arc<Bonus>>>(iter: T) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}

impl BonusBearer for BonusSet {
    fn all_bonuses(&self, selector: &Selector, limit: Option<&Selector>) -> BonusList {
        self.bonuses
            .iter()
            .filter(|b| selector.matches(b) && !limit.is_some_and(|l| l.matches(b)))
            .cloned()
            .collect()
    }
}

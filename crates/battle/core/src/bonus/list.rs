use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::bonus::Bonus;
use super::kinds::ValueType;
use super::selector::Selector;

/// Ordered sequence of shared bonus handles.
#[derive(Clone, Debug, Default)]
pub struct BonusList {
    bonuses: Vec<Arc<Bonus>>,
}

impl BonusList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bonus: Arc<Bonus>) {
        self.bonuses.push(bonus);
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

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Arc<Bonus>> {
        self.bonuses.iter_mut()
    }

    pub fn first(&self, selector: &Selector) -> Option<&Arc<Bonus>> {
        self.bonuses.iter().find(|b| selector.matches(b))
    }

    pub fn filter(&self, selector: &Selector) -> BonusList {
        self.bonuses
            .iter()
            .filter(|b| selector.matches(b))
            .cloned()
            .collect()
    }

    /// Combined value: `(base + additive) * (100 + percent) / 100`.
    pub fn total_value(&self) -> i32 {
        let mut base = 0i64;
        let mut additive = 0i64;
        let mut percent = 0i64;
        for bonus in &self.bonuses {
            match bonus.value_type {
                ValueType::BaseNumber => base += i64::from(bonus.val),
                ValueType::Additive => additive += i64::from(bonus.val),
                ValueType::PercentToBase => percent += i64::from(bonus.val),
            }
        }
        let total = (base + additive) * (100 + percent) / 100;
        total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl FromIterator<Arc<Bonus>> for BonusList {
    fn from_iter<T: IntoIterator<Item = Arc<Bonus>>>(iter: T) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for BonusList {
    type Item = Arc<Bonus>;
    type IntoIter = std::vec::IntoIter<Arc<Bonus>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonuses.into_iter()
    }
}

impl<'a> IntoIterator for &'a BonusList {
    type Item = &'a Arc<Bonus>;
    type IntoIter = std::slice::Iter<'a, Arc<Bonus>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonuses.iter()
    }
}

/// Identity of one bonus allocation: equal only to handles of the same `Arc`.
#[derive(Clone, Debug)]
pub struct BonusHandle(pub Arc<Bonus>);

impl PartialEq for BonusHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for BonusHandle {}

impl Hash for BonusHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{BonusSource, BonusType};

    #[test]
    fn total_value_applies_percent_after_flat() {
        let list: BonusList = [
            Bonus::new(BonusType::Speed, BonusSource::Creature, 6, 0)
                .with_value_type(ValueType::BaseNumber),
            Bonus::new(BonusType::Speed, BonusSource::SpellEffect, 2, 1),
            Bonus::new(BonusType::Speed, BonusSource::Artifact, 50, 0)
                .with_value_type(ValueType::PercentToBase),
        ]
        .into_iter()
        .map(Arc::new)
        .collect();
        assert_eq!(list.total_value(), 12);
    }

    #[test]
    fn handles_compare_by_allocation() {
        let a = Arc::new(Bonus::new(BonusType::Undead, BonusSource::Creature, 0, 0));
        let b = Arc::new((*a).clone());
        assert_eq!(BonusHandle(a.clone()), BonusHandle(a.clone()));
        assert_ne!(BonusHandle(a), BonusHandle(b));
    }
}

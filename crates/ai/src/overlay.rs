//! Copy-on-write bonus view.
//!
//! A [`BonusOverlay`] borrows a unit's real bonuses and records the changes a
//! simulated action would make as three deltas:
//!
//! ```text
//! effective = (source - removed) ⊕ updated ⊕ added
//!                                │
//!                                └─ same spell/type/subtype: extend turns to the max,
//!                                   otherwise append
//! ```
//!
//! The source is never written to. Merged bonuses that need a longer duration
//! are cloned on write (`Arc::make_mut`), so the real unit keeps its
//! allocation untouched.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use battle_core::{Bonus, BonusBearer, BonusHandle, BonusList, Selector};

#[derive(Clone)]
pub struct BonusOverlay<'a> {
    source: &'a dyn BonusBearer,
    added: Vec<Arc<Bonus>>,
    updated: Vec<Arc<Bonus>>,
    /// Source allocations hidden from the merged view.
    removed: HashSet<BonusHandle>,
}

impl<'a> BonusOverlay<'a> {
    pub fn new(source: &'a dyn BonusBearer) -> Self {
        Self {
            source,
            added: Vec::new(),
            updated: Vec::new(),
            removed: HashSet::new(),
        }
    }

    pub fn add(&mut self, bonuses: &[Bonus]) {
        self.added.extend(bonuses.iter().cloned().map(Arc::new));
    }

    /// Queues spell-effect updates. Repeated updates of the same spell effect
    /// collapse into one entry carrying the longest duration.
    pub fn update(&mut self, bonuses: &[Bonus]) {
        for bonus in bonuses {
            match self.updated.iter_mut().find(|b| b.same_spell_effect(bonus)) {
                Some(queued) => {
                    if bonus.turns_remain > queued.turns_remain {
                        Arc::make_mut(queued).turns_remain = bonus.turns_remain;
                    }
                }
                None => self.updated.push(Arc::new(bonus.clone())),
            }
        }
    }

    /// Hides every source bonus structurally equal to one of `bonuses` and
    /// retracts queued additions and updates with the same identity.
    pub fn remove(&mut self, bonuses: &[Bonus]) {
        for bonus in bonuses {
            let identity = Selector::identity_of(bonus);
            self.removed
                .extend(self.source.bonuses(&identity).into_iter().map(BonusHandle));
            self.added.retain(|b| !b.same_identity(bonus));
            self.updated.retain(|b| !b.same_identity(bonus));
        }
    }

    /// True while nothing has been recorded.
    pub fn is_pristine(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    fn merged(&self) -> Vec<Arc<Bonus>> {
        let mut merged: Vec<Arc<Bonus>> = self
            .source
            .bonuses(&Selector::All)
            .into_iter()
            .filter(|b| !self.removed.contains(&BonusHandle(Arc::clone(b))))
            .collect();

        for update in &self.updated {
            let mut extended = false;
            for existing in merged.iter_mut().filter(|b| b.same_spell_effect(update)) {
                if update.turns_remain > existing.turns_remain {
                    Arc::make_mut(existing).turns_remain = update.turns_remain;
                }
                extended = true;
            }
            if !extended {
                merged.push(Arc::clone(update));
            }
        }

        merged.extend(self.added.iter().cloned());
        merged
    }
}

impl BonusBearer for BonusOverlay<'_> {
    fn all_bonuses(&self, selector: &Selector, limit: Option<&Selector>) -> BonusList {
        self.merged()
            .into_iter()
            .filter(|b| selector.matches(b) && !limit.is_some_and(|l| l.matches(b)))
            .collect()
    }
}

impl fmt::Debug for BonusOverlay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BonusOverlay")
            .field("added", &self.added)
            .field("updated", &self.updated)
            .field("removed", &self.removed.len())
            .finish_non_exhaustive()
    }
}

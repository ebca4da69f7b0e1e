//! In-memory content catalogs.

use std::collections::HashMap;

use battle_core::spells::IdentifierResolver;
use battle_core::{CreatureId, Spell, SpellCatalog, SpellId};

/// Loaded spells, in file order, indexed by id.
#[derive(Clone, Debug, Default)]
pub struct SpellBook {
    spells: Vec<Spell>,
    index: HashMap<SpellId, usize>,
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `spell`; returns `false` and keeps the existing one if the id is
    /// already taken.
    pub fn insert(&mut self, spell: Spell) -> bool {
        if self.index.contains_key(&spell.id) {
            return false;
        }
        self.index.insert(spell.id, self.spells.len());
        self.spells.push(spell);
        true
    }

    pub fn by_name(&self, name: &str) -> Option<&Spell> {
        self.spells.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spell> {
        self.spells.iter()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellCatalog for SpellBook {
    fn spell(&self, id: SpellId) -> Option<&Spell> {
        self.index.get(&id).and_then(|&i| self.spells.get(i))
    }
}

/// Creature identifiers by `(scope, name)`.
#[derive(Clone, Debug, Default)]
pub struct CreatureTable {
    creatures: HashMap<(String, String), CreatureId>,
}

impl CreatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a creature; a later registration of the same name wins.
    pub fn insert(&mut self, scope: impl Into<String>, name: impl Into<String>, id: CreatureId) {
        self.creatures.insert((scope.into(), name.into()), id);
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }
}

impl IdentifierResolver for CreatureTable {
    fn creature(&self, scope: &str, name: &str) -> Option<CreatureId> {
        self.creatures
            .get(&(scope.to_owned(), name.to_owned()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_spell_ids_keep_the_first() {
        let mut book = SpellBook::new();
        assert!(book.insert(Spell::new(SpellId(1), "haste")));
        assert!(!book.insert(Spell::new(SpellId(1), "slow")));
        assert_eq!(book.len(), 1);
        assert_eq!(book.spell(SpellId(1)).map(|s| s.name.as_str()), Some("haste"));
        assert!(book.by_name("slow").is_none());
    }

    #[test]
    fn creatures_resolve_by_scope() {
        let mut table = CreatureTable::new();
        table.insert("core", "skeleton", CreatureId(56));
        table.insert("mymod", "skeleton", CreatureId(900));
        assert_eq!(table.creature("core", "skeleton"), Some(CreatureId(56)));
        assert_eq!(table.creature("mymod", "skeleton"), Some(CreatureId(900)));
        assert_eq!(table.creature("core", "lich"), None);
    }
}

//! Data-driven battle content and its loaders.
//!
//! Content arrives as RON/TOML files and leaves as the already-parsed
//! structures `battle-core` consumes:
//! - spell definitions -> [`SpellBook`] (a [`battle_core::SpellCatalog`])
//! - creature identifiers -> [`CreatureTable`] (an
//!   [`battle_core::spells::IdentifierResolver`])
//! - tunables -> [`battle_core::BattleConfig`]
//!
//! Individual bad entries are logged and skipped; only unreadable or
//! unparsable files fail a load.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{CreatureTable, SpellBook};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, CreatureEntry, CreatureLoader, LoadResult, SpellLoader,
    SpellSpec,
};

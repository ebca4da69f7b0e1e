//! Content factory for loading every battle catalog from one directory.

use std::path::{Path, PathBuf};

use battle_core::spells::IdentifierResolver;
use battle_core::{BattleConfig, EffectRegistry};

use crate::catalog::{CreatureTable, SpellBook};
use crate::loaders::{ConfigLoader, CreatureLoader, LoadResult, SpellLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── creatures.ron
/// └── spells.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the sample data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load creature identifiers from `creatures.ron`.
    pub fn load_creatures(&self) -> LoadResult<CreatureTable> {
        CreatureLoader::load(&self.data_dir.join("creatures.ron"))
    }

    /// Load spells from `spells.ron`, resolving creature conditions with
    /// `resolver` (usually the table from [`Self::load_creatures`]).
    pub fn load_spells(
        &self,
        registry: &EffectRegistry,
        resolver: &dyn IdentifierResolver,
    ) -> LoadResult<SpellBook> {
        SpellLoader::load(&self.data_dir.join("spells.ron"), registry, resolver)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

//! Creature identifier loader.

use std::path::Path;

use battle_core::CreatureId;
use serde::{Deserialize, Serialize};

use crate::catalog::CreatureTable;
use crate::loaders::{LoadResult, read_file};

/// One creature of `creatures.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureEntry {
    #[serde(default = "CreatureEntry::default_scope")]
    pub scope: String,
    pub name: String,
    pub id: u32,
}

impl CreatureEntry {
    fn default_scope() -> String {
        "core".to_owned()
    }
}

/// Loader for creature identifiers from RON files.
pub struct CreatureLoader;

impl CreatureLoader {
    /// RON format: `Vec<CreatureEntry>`.
    pub fn load(path: &Path) -> LoadResult<CreatureTable> {
        let content = read_file(path)?;
        let entries: Vec<CreatureEntry> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse creature catalog RON: {}", e))?;

        let mut table = CreatureTable::new();
        for entry in entries {
            table.insert(entry.scope, entry.name, CreatureId(entry.id));
        }
        Ok(table)
    }
}

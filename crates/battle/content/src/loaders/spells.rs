//! Spell catalog loader.
//!
//! ```text
//! [
//!     (
//!         id: 15,
//!         name: "magicArrow",
//!         level: 1,
//!         positivity: "negative",
//!         damage: true,
//!         schools: "AIR | FIRE | WATER | EARTH",
//!         levelPower: [10, 10, 20, 30],
//!         targetCondition: (noneOf: {"bonus.SIEGE_WEAPON": "absolute"}),
//!         effects: {
//!             "none": [(type: "core:damage")],
//!             "expert": [(type: "core:damage", params: {"variancePercent": 10})],
//!         },
//!     ),
//! ]
//! ```
//!
//! Effect levels are keyed `none`, `basic`, `advanced`, `expert`.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::spells::{ConditionSpec, IdentifierResolver};
use battle_core::{
    BattleConfig, EffectRegistry, EffectSpec, Positivity, Spell, SpellId, SpellSchools,
    TargetCondition,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::catalog::SpellBook;
use crate::loaders::{LoadResult, read_file};

const LEVEL_NAMES: [&str; BattleConfig::EFFECT_LEVELS] = ["none", "basic", "advanced", "expert"];

/// One spell as written in `spells.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpellSpec {
    pub id: u32,
    pub name: String,
    pub level: i32,
    /// `positive`, `negative` or `neutral` (the default).
    pub positivity: String,
    pub damage: bool,
    pub schools: SpellSchools,
    pub level_power: [i64; BattleConfig::EFFECT_LEVELS],
    pub target_condition: ConditionSpec,
    pub effects: BTreeMap<String, Vec<EffectSpec>>,
}

impl SpellSpec {
    fn positivity(&self) -> LoadResult<Positivity> {
        match self.positivity.as_str() {
            "positive" => Ok(Positivity::Positive),
            "negative" => Ok(Positivity::Negative),
            "" | "neutral" => Ok(Positivity::Neutral),
            other => Err(anyhow::anyhow!("Unknown positivity '{}'", other)),
        }
    }

    /// Resolves the spec into a spell. Bad effects and condition entries are
    /// logged and skipped by the core loaders, unknown level names here.
    pub fn build(
        &self,
        registry: &EffectRegistry,
        resolver: &dyn IdentifierResolver,
    ) -> LoadResult<Spell> {
        let mut spell = Spell::new(SpellId(self.id), self.name.clone());
        spell.level = self.level;
        spell.positivity = self.positivity()?;
        spell.damage = self.damage;
        spell.schools = self.schools;
        spell.level_power = self.level_power;
        spell.target_condition = TargetCondition::load(&self.target_condition, resolver);

        for (level_name, specs) in &self.effects {
            let Some(level) = LEVEL_NAMES.iter().position(|n| n == level_name) else {
                error!(
                    target: "battle_content::spells",
                    spell = %self.name,
                    level = %level_name,
                    "Unknown effect level"
                );
                continue;
            };
            if let Err(err) = spell.effects.load_level(specs, level, registry) {
                error!(
                    target: "battle_content::spells",
                    spell = %self.name,
                    error = %err,
                    "Failed to load effect level"
                );
            }
        }
        Ok(spell)
    }
}

/// Loader for spell definitions from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load a spell book from a RON file.
    ///
    /// The file must be a RON list; entries that do not parse as a
    /// [`SpellSpec`] or reuse an id are skipped with an error log.
    pub fn load(
        path: &Path,
        registry: &EffectRegistry,
        resolver: &dyn IdentifierResolver,
    ) -> LoadResult<SpellBook> {
        let content = read_file(path)?;
        Self::parse(&content, registry, resolver)
    }

    pub fn parse(
        content: &str,
        registry: &EffectRegistry,
        resolver: &dyn IdentifierResolver,
    ) -> LoadResult<SpellBook> {
        let entries: Vec<ron::Value> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        let mut book = SpellBook::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let spec: SpellSpec = match entry.into_rust() {
                Ok(spec) => spec,
                Err(err) => {
                    error!(
                        target: "battle_content::spells",
                        index,
                        error = %err,
                        "Skipping malformed spell entry"
                    );
                    continue;
                }
            };
            let spell = match spec.build(registry, resolver) {
                Ok(spell) => spell,
                Err(err) => {
                    error!(
                        target: "battle_content::spells",
                        spell = %spec.name,
                        error = %err,
                        "Skipping invalid spell entry"
                    );
                    continue;
                }
            };
            if !book.insert(spell) {
                error!(
                    target: "battle_content::spells",
                    id = spec.id,
                    spell = %spec.name,
                    "Skipping spell with duplicate id"
                );
            }
        }
        debug!(target: "battle_content::spells", spells = book.len(), "spell book loaded");
        Ok(book)
    }
}

//! Game configuration loaded from TOML.
//!
//! A config describes the fixed "new game" snapshot (base stats, starting
//! location, starter inventory, known characters), the day-rollover rules and
//! the item catalog.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::catalog::ItemCatalog;
use crate::entities::Item;
use crate::error::GameStateError;
use crate::mechanics::{stats, EquipmentSlot};

/// Effects applied when a new day begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolloverConfig {
    /// Stat topped up at the start of each day.
    pub vitality_stat: String,
    pub vitality_restore: i64,
    /// Stat reset to zero at the start of each day.
    pub fatigue_stat: String,
}

impl Default for RolloverConfig {
    fn default() -> Self {
        Self {
            vitality_stat: stats::ENERGY.to_string(),
            vitality_restore: 30,
            fatigue_stat: stats::FATIGUE.to_string(),
        }
    }
}

/// Item entry as written in content files. The slot is kept as a raw tag
/// until it is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: String,
    pub name: String,
    pub slot: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub modifiers: BTreeMap<String, i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl TryFrom<ItemSpec> for Item {
    type Error = GameStateError;

    fn try_from(spec: ItemSpec) -> Result<Self, Self::Error> {
        let slot = EquipmentSlot::from_tag(&spec.slot)?;
        let item = Item::new(spec.id, spec.name, slot)
            .with_price(spec.price)
            .with_description(spec.description);
        let item = spec
            .modifiers
            .into_iter()
            .fold(item, |item, (stat, amount)| item.with_modifier(stat, amount));
        Ok(spec.tags.into_iter().fold(item, |item, tag| item.with_tag(tag)))
    }
}

/// The starting content shipped with the crate.
pub const BUNDLED_CONTENT: &str = include_str!("../content/default_game.toml");

/// Full game configuration.
///
/// Missing tables fall back to empty values, so a partial file only needs
/// the fields it sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_location: String,

    /// Base stat values for a new game.
    pub stats: BTreeMap<String, i64>,

    /// Item ids placed in the inventory at new game.
    pub starter_items: Vec<String>,

    /// Characters seeded into the relationship table.
    pub characters: Vec<String>,

    pub rollover: RolloverConfig,

    pub items: Vec<ItemSpec>,
}

impl GameConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, GameStateError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse the bundled starting content.
    pub fn bundled() -> Result<Self, GameStateError> {
        Self::from_toml_str(BUNDLED_CONTENT)
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, GameStateError> {
        let content = std::fs::read_to_string(path).map_err(|source| GameStateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;

        tracing::info!(
            target: "game_state::config",
            path = %path.display(),
            items = config.items.len(),
            characters = config.characters.len(),
            "loaded game config"
        );
        Ok(config)
    }

    /// Build the item catalog described by `[[items]]`.
    pub fn catalog(&self) -> Result<ItemCatalog, GameStateError> {
        let items = self
            .items
            .iter()
            .cloned()
            .map(Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ItemCatalog::from_items(items)
    }

    /// Check that every starter item exists in `catalog`.
    pub fn validate(&self, catalog: &ItemCatalog) -> Result<(), GameStateError> {
        match self.starter_items.iter().find(|id| !catalog.contains(id)) {
            Some(missing) => Err(GameStateError::UnknownItem(missing.clone())),
            None => Ok(()),
        }
    }
}

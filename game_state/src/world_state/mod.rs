//! Game state management - the single structure holding a session's data.

mod delta;
mod undo;

pub use delta::*;
pub use undo::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::ItemCatalog;
use crate::config::GameConfig;
use crate::entities::{Item, Relationship};
use crate::error::GameStateError;
use crate::mechanics::equipment::Equipment;
use crate::mechanics::stats::compute_effective_stats;
use crate::mechanics::time::GameTime;

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Speaker {
    Player,
    Narrator,
    /// Engine notices, e.g. a failed narrative request.
    System,
}

/// One message in the session history.
///
/// Entries are append-only; only `retracted` may change after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub speaker: Speaker,
    pub text: String,
    #[serde(default)]
    pub retracted: bool,
}

impl HistoryEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            retracted: false,
        }
    }
}

/// The complete state of a session at any point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Stat key -> base value.
    pub stats: BTreeMap<String, i64>,

    /// Owned, unequipped items in display order.
    pub inventory: Vec<Item>,

    pub equipped: Equipment,

    pub time: GameTime,

    /// Opaque location identifier.
    pub location: String,

    pub history: Vec<HistoryEntry>,

    /// Character name -> relationship record.
    pub npc_relationships: BTreeMap<String, Relationship>,
}

impl GameState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the fixed new-game snapshot.
    ///
    /// Starter ids missing from the catalog are skipped here; use
    /// [`GameConfig::validate`] to reject them up front.
    pub fn new_game(config: &GameConfig, catalog: &ItemCatalog) -> Self {
        let inventory = config
            .starter_items
            .iter()
            .filter_map(|id| catalog.get(id).cloned())
            .collect();

        let npc_relationships = config
            .characters
            .iter()
            .map(|name| (name.clone(), Relationship::new()))
            .collect();

        Self {
            stats: config.stats.clone(),
            inventory,
            equipped: Equipment::new(),
            time: GameTime::default(),
            location: config.starting_location.clone(),
            history: Vec::new(),
            npc_relationships,
        }
    }

    /// Append a history entry.
    pub fn push_history(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.history.push(HistoryEntry::new(speaker, text));
    }

    /// History entries that have not been undone.
    pub fn active_history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().filter(|e| !e.retracted)
    }

    pub fn stat(&self, key: &str) -> Option<i64> {
        self.stats.get(key).copied()
    }

    /// Base stats with equipment modifiers folded in.
    pub fn effective_stats(&self) -> BTreeMap<String, i64> {
        compute_effective_stats(&self.stats, &self.equipped)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.npc_relationships.get(name)
    }

    /// Serialize the full state to JSON.
    pub fn to_json(&self) -> Result<String, GameStateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a state previously produced by [`GameState::to_json`].
    ///
    /// Saves that break the time or equipment invariants are rejected.
    pub fn from_json(json: &str) -> Result<Self, GameStateError> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants the engine relies on.
    pub fn validate(&self) -> Result<(), GameStateError> {
        self.time.validate()?;
        self.equipped.validate()
    }
}

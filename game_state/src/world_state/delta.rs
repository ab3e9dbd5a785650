//! Turn deltas and the pipeline that folds them into the game state.
//!
//! A delta is produced by the narrative collaborator once per turn. Every
//! field is optional; numbers are accepted as JSON integers or floats and
//! rounded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GameState;
use crate::catalog::ItemCatalog;
use crate::entities::{Relationship, RelationshipAxis};
use crate::mechanics::stats::{clamp_stat, FINANCE};

/// Partial change to one relationship record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RelationshipDelta {
    pub trust: Option<f64>,
    pub attraction: Option<f64>,
    pub familiarity: Option<f64>,
}

impl RelationshipDelta {
    fn axes(&self) -> [(RelationshipAxis, Option<f64>); 3] {
        [
            (RelationshipAxis::Trust, self.trust),
            (RelationshipAxis::Attraction, self.attraction),
            (RelationshipAxis::Familiarity, self.familiarity),
        ]
    }
}

/// State changes requested by the narrative collaborator for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TurnDelta {
    /// Stat key -> signed change. Clamped to [0, 100] on application.
    pub stat_changes: BTreeMap<String, f64>,

    /// Signed change to `FINANCE`, not clamped.
    pub money_change: Option<f64>,

    pub location_change: Option<String>,

    /// Character name -> partial relationship change.
    pub relationship_changes: BTreeMap<String, RelationshipDelta>,

    /// Catalog ids added to the inventory.
    pub items_gained: Vec<String>,
}

impl TurnDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stat(mut self, stat: impl Into<String>, amount: f64) -> Self {
        self.stat_changes.insert(stat.into(), amount);
        self
    }

    pub fn with_money(mut self, amount: f64) -> Self {
        self.money_change = Some(amount);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_change = Some(location.into());
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, change: RelationshipDelta) -> Self {
        self.relationship_changes.insert(name.into(), change);
        self
    }

    pub fn with_item(mut self, id: impl Into<String>) -> Self {
        self.items_gained.push(id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stat_changes.is_empty()
            && self.money_change.is_none()
            && self.location_change.is_none()
            && self.relationship_changes.is_empty()
            && self.items_gained.is_empty()
    }
}

/// What applying a delta actually did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeltaReport {
    /// Characters created because the delta named them first.
    pub discovered_characters: Vec<String>,
    pub items_gained: Vec<String>,
    /// Item ids the catalog could not resolve.
    pub skipped_items: Vec<String>,
    /// Stat keys not present in the stat table.
    pub ignored_stats: Vec<String>,
}

fn to_amount(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// Apply a turn delta to the state.
///
/// Stat changes clamp every touched stat to [0, 100], `FINANCE` included;
/// the money change writes `FINANCE` unclamped. Unknown stats are ignored,
/// unknown characters are created zeroed, unknown items are skipped.
pub fn apply_delta(state: &mut GameState, delta: &TurnDelta, catalog: &ItemCatalog) -> DeltaReport {
    let mut report = DeltaReport::default();

    for (stat, change) in &delta.stat_changes {
        match state.stats.get_mut(stat) {
            Some(value) => *value = clamp_stat(value.saturating_add(to_amount(*change))),
            None => report.ignored_stats.push(stat.clone()),
        }
    }

    if let Some(change) = delta.money_change {
        let finance = state.stats.entry(FINANCE.to_string()).or_insert(0);
        *finance = finance.saturating_add(to_amount(change));
    }

    if let Some(location) = &delta.location_change {
        state.location = location.clone();
    }

    for (name, change) in &delta.relationship_changes {
        let record = state
            .npc_relationships
            .entry(name.clone())
            .or_insert_with(|| {
                report.discovered_characters.push(name.clone());
                Relationship::new()
            });

        for (axis, amount) in change.axes() {
            if let Some(amount) = amount {
                record.adjust(axis, to_amount(amount));
            }
        }
    }

    for id in &delta.items_gained {
        match catalog.get(id) {
            Some(item) => {
                state.inventory.push(item.clone());
                report.items_gained.push(id.clone());
            }
            None => report.skipped_items.push(id.clone()),
        }
    }

    if !report.discovered_characters.is_empty() {
        tracing::debug!(
            target: "game_state::delta",
            characters = ?report.discovered_characters,
            "discovered new characters"
        );
    }
    if !report.skipped_items.is_empty() || !report.ignored_stats.is_empty() {
        tracing::warn!(
            target: "game_state::delta",
            skipped_items = ?report.skipped_items,
            ignored_stats = ?report.ignored_stats,
            "delta referenced unknown entities"
        );
    }

    report
}

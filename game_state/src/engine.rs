//! The game engine: owner of the live state and the turn lifecycle.
//!
//! A turn runs in two halves. [`GameEngine::begin_turn`] snapshots the state,
//! advances time, applies day-rollover effects and records the player's
//! action. The narrative request then happens outside the engine, and its
//! result comes back through [`GameEngine::complete_turn`] or
//! [`GameEngine::fail_turn`]. Only one turn can be pending at a time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::catalog::ItemCatalog;
use crate::config::GameConfig;
use crate::error::{GameStateError, TurnError};
use crate::mechanics::equipment::{self, EquipOutcome};
use crate::mechanics::stats::clamp_stat;
use crate::mechanics::EquipmentSlot;
use crate::world_state::{apply_delta, DeltaReport, GameState, Speaker, TurnDelta, UndoStack};

/// Identifier of a started turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A turn whose narrative response has not arrived yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub id: TurnId,
    pub action: String,
}

/// Parsed result of a narrative request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NarrativeOutcome {
    pub narrative: String,
    /// `None` when the response could not be read as structured data.
    pub delta: Option<TurnDelta>,
}

impl NarrativeOutcome {
    pub fn new(narrative: impl Into<String>, delta: Option<TurnDelta>) -> Self {
        Self {
            narrative: narrative.into(),
            delta,
        }
    }

    /// Narrative only, no state changes.
    pub fn text(narrative: impl Into<String>) -> Self {
        Self::new(narrative, None)
    }
}

/// Owns a session's state, undo history and content.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    catalog: ItemCatalog,
    state: GameState,
    undo: UndoStack,
    pending: Option<PendingTurn>,
}

impl GameEngine {
    /// Create an engine and start a new game.
    pub fn new(config: GameConfig, catalog: ItemCatalog) -> Result<Self, GameStateError> {
        config.validate(&catalog)?;
        let state = GameState::new_game(&config, &catalog);
        Ok(Self {
            config,
            catalog,
            state,
            undo: UndoStack::new(),
            pending: None,
        })
    }

    /// Create an engine using the catalog described by the config itself.
    pub fn from_config(config: GameConfig) -> Result<Self, GameStateError> {
        let catalog = config.catalog()?;
        Self::new(config, catalog)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whether a turn is waiting for its narrative response.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_turn(&self) -> Option<&PendingTurn> {
        self.pending.as_ref()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.depth()
    }

    /// Stats with equipment modifiers, for display.
    pub fn effective_stats(&self) -> BTreeMap<String, i64> {
        self.state.effective_stats()
    }

    /// Discard the session and start over from the configured snapshot.
    pub fn new_game(&mut self) {
        self.state = GameState::new_game(&self.config, &self.catalog);
        self.undo.clear();
        self.pending = None;
        tracing::info!(target: "game_state::engine", "new game started");
    }

    /// Start a turn for the player's `action`.
    ///
    /// Snapshot, time advance, rollover and the player's history entry are
    /// committed immediately and survive a failed narrative request.
    pub fn begin_turn(&mut self, action: impl Into<String>) -> Result<PendingTurn, TurnError> {
        if self.pending.is_some() {
            tracing::warn!(target: "game_state::engine", "turn rejected, another turn is pending");
            return Err(TurnError::TurnInFlight);
        }
        let action = action.into();
        if action.trim().is_empty() {
            return Err(TurnError::EmptyAction);
        }

        self.undo.push(&self.state);
        self.advance_time();
        self.state.push_history(Speaker::Player, action.clone());

        let turn = PendingTurn {
            id: TurnId::new(),
            action,
        };
        self.pending = Some(turn.clone());

        tracing::info!(
            target: "game_state::engine",
            turn = %turn.id,
            time = %self.state.time,
            "turn started"
        );
        Ok(turn)
    }

    /// Apply the narrative response for the pending turn.
    pub fn complete_turn(
        &mut self,
        id: TurnId,
        outcome: NarrativeOutcome,
    ) -> Result<DeltaReport, TurnError> {
        self.take_pending(id)?;

        let report = match &outcome.delta {
            Some(delta) => apply_delta(&mut self.state, delta, &self.catalog),
            None => DeltaReport::default(),
        };
        self.state.push_history(Speaker::Narrator, outcome.narrative);

        tracing::info!(
            target: "game_state::engine",
            turn = %id,
            structured = outcome.delta.is_some(),
            "turn completed"
        );
        Ok(report)
    }

    /// Record a failed narrative request and release the turn.
    ///
    /// The turn's snapshot and player entry stay in place, so the player can
    /// retry or undo.
    pub fn fail_turn(&mut self, id: TurnId, reason: &str) -> Result<(), TurnError> {
        self.take_pending(id)?;
        self.state.push_history(
            Speaker::System,
            format!("The story could not continue ({reason}). Try again or undo."),
        );
        tracing::warn!(target: "game_state::engine", turn = %id, reason, "turn failed");
        Ok(())
    }

    /// Abandon the pending turn. Behaves like a failure.
    pub fn cancel_turn(&mut self, id: TurnId) -> Result<(), TurnError> {
        self.fail_turn(id, "cancelled")
    }

    /// Roll back to the state before the last turn.
    ///
    /// Returns `false` without changing anything if there is nothing to undo
    /// or a turn is pending.
    pub fn undo(&mut self) -> bool {
        if self.pending.is_some() {
            tracing::debug!(target: "game_state::engine", "undo ignored, turn pending");
            return false;
        }
        match self.undo.undo(&self.state) {
            Some(previous) => {
                self.state = previous;
                tracing::info!(
                    target: "game_state::engine",
                    remaining = self.undo.depth(),
                    "turn undone"
                );
                true
            }
            None => false,
        }
    }

    /// Equip the inventory item at `index`. Out-of-range indices do nothing.
    pub fn equip(&mut self, index: usize) -> Option<EquipOutcome> {
        equipment::equip(&mut self.state.inventory, &mut self.state.equipped, index)
    }

    /// Equip any catalog item without owning it (debug surface).
    pub fn force_equip(&mut self, item_id: &str) -> Option<EquipOutcome> {
        let item = self.catalog.get(item_id)?.clone();
        Some(equipment::force_equip(
            &mut self.state.inventory,
            &mut self.state.equipped,
            item,
        ))
    }

    /// Take off whatever is in `slot`.
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Option<String> {
        equipment::unequip(&mut self.state.inventory, &mut self.state.equipped, slot)
    }

    /// Flip a character's favorite flag. Returns the new value.
    pub fn toggle_favorite(&mut self, name: &str) -> Option<bool> {
        let record = self.state.npc_relationships.get_mut(name)?;
        record.is_favorite = !record.is_favorite;
        Some(record.is_favorite)
    }

    /// Force-advance one time slot (debug surface). Returns `true` on a new day.
    pub fn debug_advance_time(&mut self) -> bool {
        self.advance_time()
    }

    /// Serialize the current state for the persistence layer.
    pub fn save(&self) -> Result<String, GameStateError> {
        self.state.to_json()
    }

    /// Replace the state with a saved one.
    ///
    /// Undo history and any pending turn are discarded.
    pub fn load(&mut self, json: &str) -> Result<(), GameStateError> {
        self.state = GameState::from_json(json)?;
        self.undo.clear();
        if let Some(turn) = self.pending.take() {
            tracing::warn!(target: "game_state::engine", turn = %turn.id, "pending turn dropped by load");
        }
        tracing::info!(target: "game_state::engine", time = %self.state.time, "game loaded");
        Ok(())
    }

    fn take_pending(&mut self, id: TurnId) -> Result<PendingTurn, TurnError> {
        match self.pending.as_ref().map(|turn| turn.id) {
            None => Err(TurnError::NoTurnInFlight),
            Some(pending) if pending != id => {
                tracing::warn!(target: "game_state::engine", turn = %id, "stale turn response ignored");
                Err(TurnError::StaleTurn)
            }
            Some(_) => self.pending.take().ok_or(TurnError::NoTurnInFlight),
        }
    }

    fn advance_time(&mut self) -> bool {
        let new_day = self.state.time.advance();
        if new_day {
            self.apply_rollover();
        }
        tracing::debug!(
            target: "game_state::engine",
            time = %self.state.time,
            new_day,
            "time advanced"
        );
        new_day
    }

    fn apply_rollover(&mut self) {
        let rules = &self.config.rollover;
        if let Some(vitality) = self.state.stats.get_mut(&rules.vitality_stat) {
            *vitality = clamp_stat(vitality.saturating_add(rules.vitality_restore));
        }
        if let Some(fatigue) = self.state.stats.get_mut(&rules.fatigue_stat) {
            *fatigue = 0;
        }
        tracing::info!(target: "game_state::engine", day = self.state.time.day, "new day");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::stats::{ENERGY, FATIGUE, FINANCE, MOOD};
    use crate::mechanics::Segment;

    fn engine() -> GameEngine {
        GameEngine::from_config(GameConfig::bundled().unwrap()).unwrap()
    }

    #[test]
    fn test_full_turn() {
        let mut engine = engine();

        let turn = engine.begin_turn("I make coffee.").unwrap();
        assert!(engine.is_busy());
        assert_eq!(engine.state().time.segment, Segment::Dawn);
        assert_eq!(engine.state().history.len(), 1);
        assert_eq!(engine.undo_depth(), 1);

        let outcome = NarrativeOutcome::new(
            "The coffee is bitter but welcome.",
            Some(TurnDelta::new().with_stat(MOOD, 5.0).with_money(-4.0)),
        );
        engine.complete_turn(turn.id, outcome).unwrap();

        assert!(!engine.is_busy());
        let history = &engine.state().history;
        assert_eq!(history[0].speaker, Speaker::Player);
        assert_eq!(history[1].speaker, Speaker::Narrator);
        assert_eq!(engine.state().stat(MOOD), Some(65));
        assert_eq!(engine.state().stat(FINANCE), Some(96));
    }

    #[test]
    fn test_second_turn_rejected_while_pending() {
        let mut engine = engine();
        engine.begin_turn("Wait.").unwrap();

        assert_eq!(engine.begin_turn("Wait again."), Err(TurnError::TurnInFlight));
        assert_eq!(engine.state().history.len(), 1);
        assert_eq!(engine.undo_depth(), 1);
    }

    #[test]
    fn test_blank_action_rejected() {
        let mut engine = engine();
        assert_eq!(engine.begin_turn("   "), Err(TurnError::EmptyAction));
        assert_eq!(engine.undo_depth(), 0);
    }

    #[test]
    fn test_unstructured_response_skips_delta() {
        let mut engine = engine();
        let before = engine.state().stats.clone();

        let turn = engine.begin_turn("Look around.").unwrap();
        let report = engine
            .complete_turn(turn.id, NarrativeOutcome::text("raw model text"))
            .unwrap();

        assert_eq!(report, DeltaReport::default());
        assert_eq!(engine.state().stats, before);
        assert_eq!(engine.state().history[1].text, "raw model text");
    }

    #[test]
    fn test_failed_turn_releases_lock_and_is_undoable() {
        let mut engine = engine();
        let start = engine.state().clone();

        let turn = engine.begin_turn("Call Mira.").unwrap();
        engine.fail_turn(turn.id, "connection reset").unwrap();

        assert!(!engine.is_busy());
        let last = engine.state().history.last().unwrap();
        assert_eq!(last.speaker, Speaker::System);
        assert!(last.text.contains("connection reset"));

        assert!(engine.undo());
        assert_eq!(engine.state().time, start.time);
        assert_eq!(engine.state().history.len(), 2);
        assert!(engine.state().history.iter().all(|e| e.retracted));
    }

    #[test]
    fn test_cancel_behaves_like_failure() {
        let mut engine = engine();
        let turn = engine.begin_turn("Leave.").unwrap();
        engine.cancel_turn(turn.id).unwrap();

        assert!(!engine.is_busy());
        assert!(engine.state().history[1].text.contains("cancelled"));
    }

    #[test]
    fn test_stale_and_missing_turn_ids() {
        let mut engine = engine();
        assert_eq!(
            engine.complete_turn(TurnId::new(), NarrativeOutcome::text("x")),
            Err(TurnError::NoTurnInFlight)
        );

        let turn = engine.begin_turn("Go.").unwrap();
        assert_eq!(
            engine.complete_turn(TurnId::new(), NarrativeOutcome::text("x")),
            Err(TurnError::StaleTurn)
        );
        assert!(engine.is_busy());
        assert!(engine.complete_turn(turn.id, NarrativeOutcome::text("ok")).is_ok());
    }

    #[test]
    fn test_undo_forbidden_mid_turn() {
        let mut engine = engine();
        engine.begin_turn("Go.").unwrap();
        assert!(!engine.undo());
        assert_eq!(engine.undo_depth(), 1);
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut engine = engine();
        let before = engine.state().clone();
        assert!(!engine.undo());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_undo_after_completed_turn() {
        let mut engine = engine();
        let start = engine.state().clone();

        let turn = engine.begin_turn("Go to the cafe.").unwrap();
        engine
            .complete_turn(
                turn.id,
                NarrativeOutcome::new("You arrive.", Some(TurnDelta::new().with_location("cafe"))),
            )
            .unwrap();
        assert!(engine.undo());

        let state = engine.state();
        assert_eq!(state.location, start.location);
        assert_eq!(state.stats, start.stats);
        assert_eq!(state.time, start.time);
        assert_eq!(state.history.len(), 2);
        assert!(state.history.iter().all(|e| e.retracted));
    }

    #[test]
    fn test_day_rollover_effects() {
        let mut engine = engine();
        for _ in 0..16 {
            assert!(!engine.debug_advance_time());
        }
        assert_eq!(engine.state().time.segment, Segment::PostNight);

        engine.state.stats.insert(ENERGY.to_string(), 50);
        engine.state.stats.insert(FATIGUE.to_string(), 70);

        engine.begin_turn("Sleep.").unwrap();

        let state = engine.state();
        assert_eq!(state.time.day, 1);
        assert_eq!(state.time.segment, Segment::PreDawn);
        assert_eq!(state.stat(ENERGY), Some(80));
        assert_eq!(state.stat(FATIGUE), Some(0));
    }

    #[test]
    fn test_rollover_restore_clamps() {
        let mut engine = engine();
        engine.state.time.segment = Segment::PostNight;
        engine.state.stats.insert(ENERGY.to_string(), 95);

        assert!(engine.debug_advance_time());
        assert_eq!(engine.state().stat(ENERGY), Some(100));
    }

    #[test]
    fn test_equip_and_force_equip() {
        let mut engine = engine();
        let total = engine.state().inventory.len();

        let outcome = engine.equip(0).unwrap();
        assert_eq!(outcome.slot, EquipmentSlot::Top);
        assert!(engine.equip(99).is_none());

        let forced = engine.force_equip("summer_dress").unwrap();
        assert_eq!(forced.displaced, vec!["tshirt".to_string()]);
        assert_eq!(engine.state().inventory.len(), total);
        assert!(engine.force_equip("tiara").is_none());

        assert_eq!(engine.unequip(EquipmentSlot::FullBody), Some("summer_dress".to_string()));
        assert_eq!(engine.effective_stats(), engine.state().stats);
    }

    #[test]
    fn test_effective_stats_include_equipment() {
        let mut engine = engine();
        engine.force_equip("blazer").unwrap();

        let effective = engine.effective_stats();
        assert_eq!(effective["CHARM"], engine.state().stat("CHARM").unwrap() + 5);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut engine = engine();
        assert_eq!(engine.toggle_favorite("Mira"), Some(true));
        assert_eq!(engine.toggle_favorite("Mira"), Some(false));
        assert_eq!(engine.toggle_favorite("Nobody"), None);
    }

    #[test]
    fn test_save_and_load() {
        let mut engine = engine();
        let turn = engine.begin_turn("Go.").unwrap();
        engine.complete_turn(turn.id, NarrativeOutcome::text("Gone.")).unwrap();
        let saved = engine.save().unwrap();

        engine.new_game();
        assert!(engine.state().history.is_empty());
        assert_eq!(engine.undo_depth(), 0);

        engine.load(&saved).unwrap();
        assert_eq!(engine.state().history.len(), 2);
        assert_eq!(engine.undo_depth(), 0);
    }

    #[test]
    fn test_load_drops_pending_turn() {
        let mut engine = engine();
        let saved = engine.save().unwrap();
        let turn = engine.begin_turn("Go.").unwrap();

        engine.load(&saved).unwrap();

        assert!(!engine.is_busy());
        assert_eq!(
            engine.complete_turn(turn.id, NarrativeOutcome::text("late")),
            Err(TurnError::NoTurnInFlight)
        );
    }

    #[test]
    fn test_load_rejects_invalid_save_and_keeps_state() {
        let mut engine = engine();
        let turn = engine.begin_turn("Go.").unwrap();
        engine.complete_turn(turn.id, NarrativeOutcome::text("Gone.")).unwrap();
        let before = engine.state().clone();

        let mut value: serde_json::Value = serde_json::from_str(&engine.save().unwrap()).unwrap();
        value["time"]["segment"] = "preDawn".into();
        value["time"]["slotsUsed"] = 2.into();

        assert!(matches!(
            engine.load(&value.to_string()),
            Err(GameStateError::InvalidState(_))
        ));
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.undo_depth(), 1);
    }

    #[test]
    fn test_new_engine_rejects_bad_starter_items() {
        let mut config = GameConfig::bundled().unwrap();
        config.starter_items.push("tiara".to_string());
        assert!(matches!(
            GameEngine::from_config(config),
            Err(GameStateError::UnknownItem(_))
        ));
    }
}

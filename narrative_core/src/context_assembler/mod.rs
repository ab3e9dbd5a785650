//! Context Assembler - Builds the request payload for the narrative collaborator.
//!
//! A request carries a summary of the current game state:
//! 1. **Time**: day, segment and slot
//! 2. **Place**: the opaque location id
//! 3. **Outfit**: what is worn in each occupied slot
//! 4. **Stats**: effective values, equipment included
//! 5. **Relationships**: every known character's scores
//! 6. **Recent history**: the last few non-retracted messages
//!
//! plus the player's action and the optional intent.

use game_state::{stats, GameState, Speaker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::collaborators::Intent;
use crate::response::RESPONSE_FORMAT;

/// Configuration for request assembly.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// Number of recent history entries included in a request.
    pub history_window: usize,

    /// Whether to append the JSON response format instructions to prompts.
    pub include_format_instructions: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            history_window: 8,
            include_format_instructions: true,
        }
    }
}

/// Builds collaborator requests from game state.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    config: AssemblerConfig,
}

impl ContextAssembler {
    /// Create a new context assembler with the given configuration.
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Create a context assembler with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(AssemblerConfig::default())
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Summarize the state for a collaborator.
    pub fn summarize(&self, state: &GameState) -> StateContext {
        StateContext {
            time: TimeContext {
                day: state.time.day,
                segment: state.time.segment.label().to_string(),
                slot: if state.time.segment.is_zero_slot() {
                    None
                } else {
                    Some(state.time.slots_used.saturating_add(1))
                },
            },
            location: state.location.clone(),
            outfit: self.extract_outfit(state),
            stats: self.extract_stats(state),
            relationships: self.extract_relationships(state),
            recent_history: Vec::new(),
        }
    }

    /// Assemble the request for a turn that has already been started.
    ///
    /// The player's own entry at the end of the history is not repeated in
    /// `recent_history`; it travels as `player_action`.
    pub fn assemble(&self, state: &GameState, action: &str, intent: Option<&Intent>) -> TurnRequest {
        let mut context = self.summarize(state);
        context.recent_history = self.extract_history(state, action);

        TurnRequest {
            context,
            player_action: action.to_string(),
            intent: intent.cloned(),
            include_format_instructions: self.config.include_format_instructions,
        }
    }

    fn extract_outfit(&self, state: &GameState) -> Vec<OutfitEntry> {
        state
            .equipped
            .iter()
            .map(|(slot, item)| OutfitEntry {
                slot: slot.as_tag().to_string(),
                item: item.name.clone(),
            })
            .collect()
    }

    /// Effective stats in display form.
    fn extract_stats(&self, state: &GameState) -> BTreeMap<String, i64> {
        state
            .effective_stats()
            .into_iter()
            .map(|(key, value)| {
                let shown = stats::display_value(&key, value);
                (key, shown)
            })
            .collect()
    }

    fn extract_relationships(&self, state: &GameState) -> Vec<RelationshipContext> {
        state
            .npc_relationships
            .iter()
            .map(|(name, rel)| RelationshipContext {
                name: name.clone(),
                trust: rel.trust,
                attraction: rel.attraction,
                familiarity: rel.familiarity,
                is_favorite: rel.is_favorite,
            })
            .collect()
    }

    fn extract_history(&self, state: &GameState, action: &str) -> Vec<HistoryLine> {
        let mut active: Vec<_> = state.active_history().collect();
        if let Some(last) = active.last() {
            if last.speaker == Speaker::Player && last.text == action {
                active.pop();
            }
        }

        let skip = active.len().saturating_sub(self.config.history_window);
        active
            .into_iter()
            .skip(skip)
            .map(|entry| HistoryLine {
                speaker: entry.speaker,
                text: entry.text.clone(),
            })
            .collect()
    }
}

/// Time context for the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeContext {
    pub day: u32,
    pub segment: String,
    /// 1-based slot within the segment; `None` in transitional segments.
    pub slot: Option<u8>,
}

/// One worn item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitEntry {
    pub slot: String,
    pub item: String,
}

/// Relationship scores for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipContext {
    pub name: String,
    pub trust: i64,
    pub attraction: i64,
    pub familiarity: i64,
    pub is_favorite: bool,
}

/// A message from the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    pub speaker: Speaker,
    pub text: String,
}

/// Summary of the game state shared by all collaborator requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateContext {
    pub time: TimeContext,
    pub location: String,
    pub outfit: Vec<OutfitEntry>,
    pub stats: BTreeMap<String, i64>,
    pub relationships: Vec<RelationshipContext>,
    pub recent_history: Vec<HistoryLine>,
}

impl StateContext {
    /// Format the state summary as prompt sections.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Time & Place\n");
        prompt.push_str(&format!("Day {}, {}", self.time.day, self.time.segment));
        if let Some(slot) = self.time.slot {
            prompt.push_str(&format!(" (slot {}/3)", slot));
        }
        prompt.push_str(&format!("\nLocation: {}\n\n", self.location));

        prompt.push_str("## Outfit\n");
        if self.outfit.is_empty() {
            prompt.push_str("Nothing worn.\n");
        } else {
            for entry in &self.outfit {
                prompt.push_str(&format!("- {}: {}\n", entry.slot, entry.item));
            }
        }
        prompt.push('\n');

        prompt.push_str("## Stats\n");
        let stats: Vec<_> = self
            .stats
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        prompt.push_str(&stats.join(", "));
        prompt.push_str("\n\n");

        if !self.relationships.is_empty() {
            prompt.push_str("## Relationships\n");
            for rel in &self.relationships {
                prompt.push_str(&format!(
                    "- {}{}: trust {}, attraction {}, familiarity {}\n",
                    rel.name,
                    if rel.is_favorite { " (favorite)" } else { "" },
                    rel.trust,
                    rel.attraction,
                    rel.familiarity
                ));
            }
            prompt.push('\n');
        }

        if !self.recent_history.is_empty() {
            prompt.push_str("## Recent Events\n");
            for line in &self.recent_history {
                let who = match line.speaker {
                    Speaker::Player => "Player",
                    Speaker::Narrator => "Narrator",
                    Speaker::System => "System",
                };
                prompt.push_str(&format!("{}: {}\n", who, line.text));
            }
            prompt.push('\n');
        }

        prompt
    }
}

/// Payload sent to the narrative generator for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub context: StateContext,
    pub player_action: String,
    pub intent: Option<Intent>,
    #[serde(skip)]
    pub include_format_instructions: bool,
}

impl TurnRequest {
    /// Format the request as a prompt string.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = self.context.to_prompt_string();

        if let Some(intent) = &self.intent {
            prompt.push_str("## Intent\n");
            prompt.push_str(&intent.label);
            if !intent.description.is_empty() {
                prompt.push_str(&format!(": {}", intent.description));
            }
            prompt.push_str("\n\n");
        }

        prompt.push_str("## Player Action\n");
        prompt.push_str(&self.player_action);
        prompt.push_str("\n\n");

        if self.include_format_instructions {
            prompt.push_str("## Response Format\n");
            prompt.push_str(RESPONSE_FORMAT);
            prompt.push('\n');
        }

        prompt
    }
}

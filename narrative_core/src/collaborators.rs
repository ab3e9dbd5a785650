//! Interfaces to the external text-generation services.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context_assembler::{StateContext, TurnRequest};

/// The kind of action the player wants to take next, e.g. "Flirt" or "Work".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

impl Intent {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Failures reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("narrative service unavailable: {0}")]
    Unavailable(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Produces the story's response to a player action.
///
/// Implementations return the raw response body; parsing is tolerant and
/// handled by [`crate::response::parse_response`].
pub trait NarrativeGenerator {
    fn generate(&self, request: &TurnRequest) -> Result<String, NarrativeError>;
}

/// Suggests candidate actions for a selected intent.
pub trait ChoiceSuggester {
    fn suggest(&self, context: &StateContext, intent: &Intent) -> Result<Vec<String>, NarrativeError>;
}

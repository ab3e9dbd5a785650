//! Error types for the game state engine.
//!
//! Only content and persistence problems are errors. Runtime oddities such as
//! unknown stat keys, unknown item ids or an empty undo stack are recovered
//! in place and logged.

use thiserror::Error;

/// Errors raised while loading content or (de)serializing state.
#[derive(Debug, Error)]
pub enum GameStateError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid game config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("unknown equipment slot type '{0}'")]
    UnknownSlotType(String),

    #[error("item '{0}' is defined more than once")]
    DuplicateItem(String),

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid saved state: {0}")]
    InvalidState(String),
}

/// Reasons a turn command was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("a turn is already in progress")]
    TurnInFlight,

    #[error("no turn is in progress")]
    NoTurnInFlight,

    #[error("response belongs to a turn that is no longer pending")]
    StaleTurn,

    #[error("action text is empty")]
    EmptyAction,
}

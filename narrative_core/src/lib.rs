//! # Narrative Core
//!
//! The boundary between the game state engine and the external text
//! generators. This crate assembles requests from `game_state`, parses
//! whatever comes back, and drives complete turns.
//!
//! ## Core Components
//!
//! - **context_assembler**: Builds the state summary and turn request
//! - **response**: Tolerant parsing of narrative responses into deltas
//! - **choices**: Cleans up suggested actions for the selection surface
//! - **session**: Runs a full turn against a `NarrativeGenerator`
//!
//! ## Design Philosophy
//!
//! - **State-Driven**: Every request is derived from the current game state
//! - **Forgiving**: Malformed responses degrade to plain narrative, never to errors
//! - **Engine-Owned**: Only `game_state` mutates state; this crate issues commands

pub mod choices;
pub mod collaborators;
pub mod context_assembler;
pub mod response;
pub mod session;

pub use choices::*;
pub use collaborators::*;
pub use context_assembler::*;
pub use response::*;
pub use session::*;

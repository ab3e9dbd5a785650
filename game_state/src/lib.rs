//! # Game State
//!
//! The engine behind a role-play session: it owns the player's state (time,
//! stats, inventory, equipment, relationships, location, history) and advances
//! it once per turn from structured deltas supplied by a narrative
//! collaborator. This crate is synchronous and contains no narrative or AI
//! logic.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod world_state;

pub use catalog::*;
pub use config::*;
pub use engine::*;
pub use entities::*;
pub use error::*;
pub use mechanics::equipment::{Equipment, EquipOutcome};
pub use mechanics::stats;
pub use mechanics::time::GameTime;
pub use mechanics::{EquipmentSlot, Segment};
pub use world_state::*;

//! Entity definitions: items the player can own and wear, and NPC relationships.

mod item;
mod relationship;

pub use item::*;
pub use relationship::*;

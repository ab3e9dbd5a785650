//! Equipment slots and the equip/swap rules.
//!
//! Every operation here moves items between the inventory and the equipped
//! partition without ever dropping one: whatever leaves a slot goes back into
//! the inventory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::EquipmentSlot;
use crate::entities::Item;
use crate::error::GameStateError;

/// The equipped partition: at most one item per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Equipment {
    slots: BTreeMap<EquipmentSlot, Item>,
}

impl Equipment {
    /// Create an empty equipment set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn is_occupied(&self, slot: EquipmentSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    /// Iterate over equipped items.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.slots.values()
    }

    /// Check that every item sits in its own slot and that no two
    /// exclusive slots are filled together.
    pub fn validate(&self) -> Result<(), GameStateError> {
        for (slot, item) in self.iter() {
            if item.slot != slot {
                return Err(GameStateError::InvalidState(format!(
                    "item '{}' belongs in {}, found in {}",
                    item.id, item.slot, slot
                )));
            }
            if let Some(other) = slot.exclusive_with().iter().find(|s| self.is_occupied(**s)) {
                return Err(GameStateError::InvalidState(format!(
                    "{slot} and {other} cannot be worn together"
                )));
            }
        }
        Ok(())
    }

    fn take(&mut self, slot: EquipmentSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    fn put(&mut self, item: Item) -> Option<Item> {
        self.slots.insert(item.slot, item)
    }
}

/// What an equip operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipOutcome {
    pub slot: EquipmentSlot,
    pub item_id: String,
    /// Items pushed back into the inventory, in the order they were removed.
    pub displaced: Vec<String>,
}

/// Equip the inventory item at `index`.
///
/// Returns `None` and leaves everything untouched if the index is out of range.
pub fn equip(
    inventory: &mut Vec<Item>,
    equipped: &mut Equipment,
    index: usize,
) -> Option<EquipOutcome> {
    if index >= inventory.len() {
        tracing::debug!(
            target: "game_state::equipment",
            index,
            inventory_len = inventory.len(),
            "equip ignored, no item at index"
        );
        return None;
    }

    // Remove by the original index before anything is pushed back.
    let item = inventory.remove(index);
    Some(place(inventory, equipped, item))
}

/// Equip an item the player does not necessarily own (debug surface).
pub fn force_equip(inventory: &mut Vec<Item>, equipped: &mut Equipment, item: Item) -> EquipOutcome {
    place(inventory, equipped, item)
}

/// Move the item in `slot` back to the inventory.
pub fn unequip(
    inventory: &mut Vec<Item>,
    equipped: &mut Equipment,
    slot: EquipmentSlot,
) -> Option<String> {
    let item = equipped.take(slot)?;
    let id = item.id.clone();
    inventory.push(item);
    Some(id)
}

fn place(inventory: &mut Vec<Item>, equipped: &mut Equipment, item: Item) -> EquipOutcome {
    let slot = item.slot;
    let item_id = item.id.clone();
    let mut displaced = Vec::new();

    for blocked in slot.exclusive_with() {
        if let Some(old) = equipped.take(*blocked) {
            displaced.push(old);
        }
    }
    if let Some(old) = equipped.put(item) {
        displaced.push(old);
    }

    let displaced_ids: Vec<String> = displaced.iter().map(|i| i.id.clone()).collect();
    inventory.extend(displaced);

    tracing::debug!(
        target: "game_state::equipment",
        slot = %slot,
        item = %item_id,
        displaced = ?displaced_ids,
        "item equipped"
    );

    EquipOutcome {
        slot,
        item_id,
        displaced: displaced_ids,
    }
}

//! Item definitions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::mechanics::EquipmentSlot;

/// An ownable, wearable item.
///
/// Items are values: equipping moves a copy between inventory and the
/// equipment slots, nothing mutates an item in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    pub price: i64,

    /// Stat key -> additive contribution while equipped.
    #[serde(default)]
    pub modifiers: BTreeMap<String, i64>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Item {
    /// Create a new item with no modifiers or tags.
    pub fn new(id: impl Into<String>, name: impl Into<String>, slot: EquipmentSlot) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slot,
            price: 0,
            modifiers: BTreeMap::new(),
            description: String::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Set the base price.
    pub fn with_price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    /// Add a stat modifier.
    pub fn with_modifier(mut self, stat: impl Into<String>, amount: i64) -> Self {
        self.modifiers.insert(stat.into(), amount);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

//! Game mechanics: equipment slots, day segments, and the rules that act on them.

pub mod equipment;
pub mod stats;
pub mod time;

use serde::{Deserialize, Serialize};

use crate::error::GameStateError;

/// Equipment slots on the player's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentSlot {
    Top,
    Bottom,
    Footwear,
    UnderwearTop,
    UnderwearBottom,
    Accessory,
    /// Dresses, jumpsuits and the like. Excludes `Top` and `Bottom`.
    FullBody,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 7] = [
        EquipmentSlot::Top,
        EquipmentSlot::Bottom,
        EquipmentSlot::Footwear,
        EquipmentSlot::UnderwearTop,
        EquipmentSlot::UnderwearBottom,
        EquipmentSlot::Accessory,
        EquipmentSlot::FullBody,
    ];

    /// Resolve an item's slot-type tag to its equipment slot.
    ///
    /// The mapping is one tag per slot. Unrecognized tags are a content error
    /// rather than a silent fallback to `Accessory`.
    pub fn from_tag(tag: &str) -> Result<Self, GameStateError> {
        match tag {
            "top" => Ok(EquipmentSlot::Top),
            "bottom" => Ok(EquipmentSlot::Bottom),
            "footwear" => Ok(EquipmentSlot::Footwear),
            "underwearTop" => Ok(EquipmentSlot::UnderwearTop),
            "underwearBottom" => Ok(EquipmentSlot::UnderwearBottom),
            "accessory" => Ok(EquipmentSlot::Accessory),
            "fullBody" => Ok(EquipmentSlot::FullBody),
            other => Err(GameStateError::UnknownSlotType(other.to_string())),
        }
    }

    /// The tag used for this slot in content files and saves.
    pub fn as_tag(&self) -> &'static str {
        match self {
            EquipmentSlot::Top => "top",
            EquipmentSlot::Bottom => "bottom",
            EquipmentSlot::Footwear => "footwear",
            EquipmentSlot::UnderwearTop => "underwearTop",
            EquipmentSlot::UnderwearBottom => "underwearBottom",
            EquipmentSlot::Accessory => "accessory",
            EquipmentSlot::FullBody => "fullBody",
        }
    }

    /// Slots that cannot be occupied at the same time as this one.
    pub fn exclusive_with(&self) -> &'static [EquipmentSlot] {
        match self {
            EquipmentSlot::FullBody => &[EquipmentSlot::Top, EquipmentSlot::Bottom],
            EquipmentSlot::Top | EquipmentSlot::Bottom => &[EquipmentSlot::FullBody],
            _ => &[],
        }
    }
}

impl std::fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// Phases of a day, in cyclic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Segment {
    /// Transitional, zero slots. A new day starts here.
    #[default]
    PreDawn,
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Night,
    /// Transitional, zero slots.
    PostNight,
}

impl Segment {
    pub const ALL: [Segment; 7] = [
        Segment::PreDawn,
        Segment::Dawn,
        Segment::Morning,
        Segment::Afternoon,
        Segment::Evening,
        Segment::Night,
        Segment::PostNight,
    ];

    /// Highest slot index of a normal segment (slots 0, 1 and 2).
    pub const MAX_SLOT: u8 = 2;

    /// Position of this segment in the daily cycle.
    pub fn index(&self) -> usize {
        match self {
            Segment::PreDawn => 0,
            Segment::Dawn => 1,
            Segment::Morning => 2,
            Segment::Afternoon => 3,
            Segment::Evening => 4,
            Segment::Night => 5,
            Segment::PostNight => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this segment is a transitional phase without action slots.
    pub fn is_zero_slot(&self) -> bool {
        matches!(self, Segment::PreDawn | Segment::PostNight)
    }

    /// Human-readable label for prompts and display.
    pub fn label(&self) -> &'static str {
        match self {
            Segment::PreDawn => "Pre-dawn",
            Segment::Dawn => "Dawn",
            Segment::Morning => "Morning",
            Segment::Afternoon => "Afternoon",
            Segment::Evening => "Evening",
            Segment::Night => "Night",
            Segment::PostNight => "Late night",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_tag_roundtrip() {
        for slot in EquipmentSlot::ALL {
            assert_eq!(EquipmentSlot::from_tag(slot.as_tag()).unwrap(), slot);
        }
    }

    #[test]
    fn test_unknown_slot_tag_is_error() {
        let err = EquipmentSlot::from_tag("cape").unwrap_err();
        assert!(matches!(err, GameStateError::UnknownSlotType(t) if t == "cape"));
    }

    #[test]
    fn test_exclusivity_is_symmetric() {
        for slot in EquipmentSlot::ALL {
            for other in slot.exclusive_with() {
                assert!(other.exclusive_with().contains(&slot));
            }
        }
    }

    #[test]
    fn test_segment_index_order() {
        for (i, segment) in Segment::ALL.iter().enumerate() {
            assert_eq!(segment.index(), i);
            assert_eq!(Segment::from_index(i), Some(*segment));
        }
        assert_eq!(Segment::from_index(7), None);
    }

    #[test]
    fn test_zero_slot_segments() {
        let zero: Vec<_> = Segment::ALL.iter().filter(|s| s.is_zero_slot()).collect();
        assert_eq!(zero, vec![&Segment::PreDawn, &Segment::PostNight]);
    }
}

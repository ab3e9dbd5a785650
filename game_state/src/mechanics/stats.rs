//! Player stats: well-known keys, clamping, and equipment aggregation.

use std::collections::BTreeMap;

use super::equipment::Equipment;

pub const HEALTH: &str = "HEALTH";
/// Restored at day rollover.
pub const ENERGY: &str = "ENERGY";
/// Cleared at day rollover.
pub const FATIGUE: &str = "FATIGUE";
pub const MOOD: &str = "MOOD";
pub const CHARM: &str = "CHARM";
pub const INTELLECT: &str = "INTELLECT";
pub const FITNESS: &str = "FITNESS";
/// Currency. Signed and unbounded on the money path.
pub const FINANCE: &str = "FINANCE";
/// Unbounded, displayed relative to a midpoint of 50.
pub const SOCIAL_CLASS: &str = "SOCIAL_CLASS";

pub const STAT_MIN: i64 = 0;
pub const STAT_MAX: i64 = 100;

/// Offset subtracted from `SOCIAL_CLASS` for display.
pub const SOCIAL_CLASS_DISPLAY_OFFSET: i64 = 50;

/// Clamp a bounded stat to [0, 100].
pub fn clamp_stat(value: i64) -> i64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Whether a stat lives outside the [0, 100] range.
pub fn is_unbounded(stat: &str) -> bool {
    stat == FINANCE || stat == SOCIAL_CLASS
}

/// Value as shown to the player.
pub fn display_value(stat: &str, value: i64) -> i64 {
    if stat == SOCIAL_CLASS {
        value - SOCIAL_CLASS_DISPLAY_OFFSET
    } else {
        value
    }
}

/// Fold equipped-item modifiers into the base stats.
///
/// This is a display projection: no clamping happens here, and modifiers for
/// stats missing from `base` are ignored.
pub fn compute_effective_stats(
    base: &BTreeMap<String, i64>,
    equipped: &Equipment,
) -> BTreeMap<String, i64> {
    let mut effective = base.clone();

    for item in equipped.items() {
        for (stat, amount) in &item.modifiers {
            if let Some(value) = effective.get_mut(stat) {
                *value += amount;
            }
        }
    }

    effective
}

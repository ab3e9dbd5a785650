//! Day/segment/slot progression.

use serde::{Deserialize, Serialize};

use super::Segment;
use crate::error::GameStateError;

/// Result of advancing the time cursor by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAdvance {
    pub segment: Segment,
    pub slots_used: u8,
    /// Set only when the cycle wraps from `PostNight` to `PreDawn`.
    pub new_day: bool,
}

/// Advance the time cursor by one slot.
///
/// Zero-slot segments always move on to the next segment. Normal segments
/// fill slots 0, 1 and 2 before moving on. Pure function of its inputs.
pub fn advance(segment: Segment, slots_used: u8) -> TimeAdvance {
    if !segment.is_zero_slot() && slots_used < Segment::MAX_SLOT {
        return TimeAdvance {
            segment,
            slots_used: slots_used + 1,
            new_day: false,
        };
    }

    if segment == Segment::PostNight {
        return TimeAdvance {
            segment: Segment::PreDawn,
            slots_used: 0,
            new_day: true,
        };
    }

    match Segment::from_index(segment.index() + 1) {
        Some(next) => TimeAdvance {
            segment: next,
            slots_used: 0,
            new_day: false,
        },
        None => {
            // Unreachable while PostNight closes the cycle; keep time moving.
            tracing::warn!(
                target: "game_state::time",
                segment = ?segment,
                "segment index overflow, resetting to pre-dawn"
            );
            TimeAdvance {
                segment: Segment::PreDawn,
                slots_used: 0,
                new_day: true,
            }
        }
    }
}

/// In-game time cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GameTime {
    pub day: u32,
    pub segment: Segment,
    pub slots_used: u8,
}

impl GameTime {
    /// Create a new time cursor.
    pub fn new(day: u32, segment: Segment, slots_used: u8) -> Self {
        Self {
            day,
            segment,
            slots_used,
        }
    }

    /// Step one slot forward. Returns `true` when a new day began.
    pub fn advance(&mut self) -> bool {
        let step = advance(self.segment, self.slots_used);
        self.segment = step.segment;
        self.slots_used = step.slots_used;
        if step.new_day {
            self.day += 1;
        }
        step.new_day
    }

    /// Check the slot counter against the segment's capacity.
    pub fn validate(&self) -> Result<(), GameStateError> {
        let max = if self.segment.is_zero_slot() { 0 } else { Segment::MAX_SLOT };
        if self.slots_used > max {
            return Err(GameStateError::InvalidState(format!(
                "{} allows at most {} used slots, found {}",
                self.segment, max, self.slots_used
            )));
        }
        Ok(())
    }

    /// Slots still available in the current segment.
    pub fn slots_remaining(&self) -> u8 {
        if self.segment.is_zero_slot() {
            0
        } else {
            Segment::MAX_SLOT.saturating_sub(self.slots_used) + 1
        }
    }
}

impl std::fmt::Display for GameTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day {}, {}", self.day, self.segment)?;
        if !self.segment.is_zero_slot() {
            write!(f, " ({}/3)", self.slots_used.saturating_add(1))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_dawn_moves_to_dawn() {
        let step = advance(Segment::PreDawn, 0);
        assert_eq!(step.segment, Segment::Dawn);
        assert_eq!(step.slots_used, 0);
        assert!(!step.new_day);
    }

    #[test]
    fn test_normal_segment_fills_slots() {
        let step = advance(Segment::Morning, 0);
        assert_eq!((step.segment, step.slots_used), (Segment::Morning, 1));

        let step = advance(Segment::Morning, 1);
        assert_eq!((step.segment, step.slots_used), (Segment::Morning, 2));

        let step = advance(Segment::Morning, 2);
        assert_eq!((step.segment, step.slots_used), (Segment::Afternoon, 0));
        assert!(!step.new_day);
    }

    #[test]
    fn test_night_moves_to_post_night() {
        let step = advance(Segment::Night, 2);
        assert_eq!(step.segment, Segment::PostNight);
        assert_eq!(step.slots_used, 0);
    }

    #[test]
    fn test_only_post_night_starts_new_day() {
        for segment in Segment::ALL {
            for slots in 0..=Segment::MAX_SLOT {
                let step = advance(segment, slots);
                let wraps = segment == Segment::PostNight;
                assert_eq!(step.new_day, wraps, "{segment:?} slot {slots}");
                if wraps {
                    assert_eq!(step.segment, Segment::PreDawn);
                }
            }
        }
    }

    #[test]
    fn test_slots_stay_in_range_over_many_steps() {
        let mut time = GameTime::default();
        let mut days = 0;
        for _ in 0..500 {
            if time.advance() {
                days += 1;
            }
            if time.segment.is_zero_slot() {
                assert_eq!(time.slots_used, 0);
            } else {
                assert!(time.slots_used <= Segment::MAX_SLOT);
            }
        }
        assert_eq!(time.day, days);
    }

    #[test]
    fn test_full_day_length() {
        // 15 normal slots and PostNight before the wrap.
        let mut time = GameTime::default();
        let mut steps = 0;
        while !time.advance() {
            steps += 1;
        }
        assert_eq!(steps, 16);
        assert_eq!(time, GameTime::new(1, Segment::PreDawn, 0));
    }

    #[test]
    fn test_slots_remaining() {
        assert_eq!(GameTime::new(0, Segment::PreDawn, 0).slots_remaining(), 0);
        assert_eq!(GameTime::new(0, Segment::Dawn, 0).slots_remaining(), 3);
        assert_eq!(GameTime::new(0, Segment::Dawn, 2).slots_remaining(), 1);
    }

    #[test]
    fn test_validate_slot_ranges() {
        for segment in Segment::ALL {
            let max = if segment.is_zero_slot() { 0 } else { Segment::MAX_SLOT };
            for slots in 0..=max {
                assert!(GameTime::new(3, segment, slots).validate().is_ok());
            }
            assert!(matches!(
                GameTime::new(3, segment, max + 1).validate(),
                Err(GameStateError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn test_display_saturates_slot_counter() {
        let time = GameTime::new(2, Segment::Morning, u8::MAX);
        assert!(time.to_string().ends_with("(255/3)"));
        assert_eq!(GameTime::new(2, Segment::PostNight, 0).to_string(), "Day 2, Late night");
    }
}

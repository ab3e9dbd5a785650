//! Relationship records between the player and named characters.

use serde::{Deserialize, Serialize};

use crate::mechanics::stats::clamp_stat;

/// How a character feels about the player. Scores live in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub trust: i64,
    pub attraction: i64,
    pub familiarity: i64,
    #[serde(default)]
    pub is_favorite: bool,
}

/// Relationship axes a turn delta can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipAxis {
    Trust,
    Attraction,
    Familiarity,
}

impl Relationship {
    /// A zeroed record, used for seeded and newly discovered characters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: RelationshipAxis) -> i64 {
        match axis {
            RelationshipAxis::Trust => self.trust,
            RelationshipAxis::Attraction => self.attraction,
            RelationshipAxis::Familiarity => self.familiarity,
        }
    }

    /// Add `amount` to one axis, clamping the result to [0, 100].
    pub fn adjust(&mut self, axis: RelationshipAxis, amount: i64) {
        let field = match axis {
            RelationshipAxis::Trust => &mut self.trust,
            RelationshipAxis::Attraction => &mut self.attraction,
            RelationshipAxis::Familiarity => &mut self.familiarity,
        };
        *field = clamp_stat(field.saturating_add(amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_relationship_is_zeroed() {
        let rel = Relationship::new();
        assert_eq!((rel.trust, rel.attraction, rel.familiarity), (0, 0, 0));
        assert!(!rel.is_favorite);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut rel = Relationship::new();
        rel.adjust(RelationshipAxis::Trust, 150);
        rel.adjust(RelationshipAxis::Attraction, -20);
        rel.adjust(RelationshipAxis::Familiarity, 35);

        assert_eq!(rel.get(RelationshipAxis::Trust), 100);
        assert_eq!(rel.get(RelationshipAxis::Attraction), 0);
        assert_eq!(rel.get(RelationshipAxis::Familiarity), 35);
    }
}

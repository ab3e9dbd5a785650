//! Linear undo over pre-turn snapshots.

use super::GameState;

/// Stack of full state snapshots, one per started turn.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    snapshots: Vec<GameState>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deep copy of `state`.
    pub fn push(&mut self, state: &GameState) {
        self.snapshots.push(state.clone());
    }

    /// Restore the most recent snapshot.
    ///
    /// History appended since the snapshot is kept, marked retracted, after
    /// the snapshot's own history. Returns `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &GameState) -> Option<GameState> {
        let mut restored = self.snapshots.pop()?;

        let kept = restored.history.len();
        let retracted = current.history.iter().skip(kept).cloned().map(|mut entry| {
            entry.retracted = true;
            entry
        });
        restored.history.extend(retracted);

        Some(restored)
    }

    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

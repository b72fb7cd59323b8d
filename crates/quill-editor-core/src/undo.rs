//! Undo/redo management for editor content.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `SnapshotHistory` - whole-markup snapshots with bounded depth

/// Trait for managing undo/redo operations.
///
/// Implementations must actually perform the undo/redo, not just track
/// state.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Perform undo. Returns true if successful.
    fn undo(&mut self) -> bool;

    /// Perform redo. Returns true if successful.
    fn redo(&mut self) -> bool;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// Markup-snapshot history.
///
/// Commands operate on the whole tree at once (wrap/unwrap/splice), so
/// history is kept as full markup snapshots rather than per-edit
/// deltas. `commit` after each command; `current` always holds the
/// state the region should show.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    past: Vec<String>,
    future: Vec<String>,
    current: String,
    max_steps: usize,
}

impl SnapshotHistory {
    /// Create a history seeded with the initial content.
    pub fn new(initial: &str, max_steps: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            current: initial.to_string(),
            max_steps,
        }
    }

    /// The snapshot the region should currently show.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Record a new state. A no-op if the state is unchanged. Any redo
    /// history is discarded on a fresh edit.
    pub fn commit(&mut self, markup: &str) {
        if markup == self.current {
            return;
        }
        self.future.clear();
        let previous = std::mem::replace(&mut self.current, markup.to_string());
        self.past.push(previous);
        while self.past.len() > self.max_steps {
            self.past.remove(0);
        }
    }

    /// Reset to a new baseline, dropping all history.
    pub fn reset(&mut self, markup: &str) {
        self.past.clear();
        self.future.clear();
        self.current = markup.to_string();
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new("", 100)
    }
}

impl UndoManager for SnapshotHistory {
    fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.future.push(current);
        true
    }

    fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.past.push(current);
        true
    }

    fn clear_history(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = SnapshotHistory::new("a", 100);
        history.commit("ab");
        history.commit("abc");

        assert!(history.undo());
        assert_eq!(history.current(), "ab");
        assert!(history.undo());
        assert_eq!(history.current(), "a");
        assert!(!history.undo());

        assert!(history.redo());
        assert_eq!(history.current(), "ab");
        assert!(history.redo());
        assert_eq!(history.current(), "abc");
        assert!(!history.redo());
    }

    #[test]
    fn test_edit_clears_redo() {
        let mut history = SnapshotHistory::new("a", 100);
        history.commit("ab");
        history.undo();
        assert!(history.can_redo());

        history.commit("ax");
        assert!(!history.can_redo());
        assert_eq!(history.current(), "ax");
    }

    #[test]
    fn test_unchanged_commit_is_noop() {
        let mut history = SnapshotHistory::new("a", 100);
        history.commit("a");
        assert!(!history.can_undo());
    }

    #[test]
    fn test_depth_bound() {
        let mut history = SnapshotHistory::new("0", 3);
        for i in 1..10 {
            history.commit(&i.to_string());
        }
        let mut undone = 0;
        while history.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(history.current(), "6");
    }
}

//! Snapshot undo/redo history
//!
//! A linear list of states with a cursor. Pushing while the cursor is behind
//! the newest entry discards the redo branch. Consecutive equal states are
//! never stored twice.

/// Linear undo/redo history over immutable snapshots
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    /// Index of the current state in `entries`
    cursor: usize,
    /// Maximum number of entries (0 = unlimited)
    limit: usize,
}

impl<T: Clone + PartialEq> History<T> {
    /// Create a history whose only entry is `initial`
    pub fn new(initial: T, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit,
        }
    }

    /// The state at the cursor
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Record a new state.
    ///
    /// Returns `false` (and records nothing) when `state` equals the current
    /// entry.
    pub fn push(&mut self, state: T) -> bool {
        if *self.current() == state {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(state);

        if self.limit > 0 && self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    /// Step back one entry and return the restored state
    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry and return the restored state
    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Drop every entry except the current one
    pub fn clear(&mut self) {
        let current = self.entries.swap_remove(self.cursor);
        self.entries.clear();
        self.entries.push(current);
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of steps available to undo
    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    /// Number of steps available to redo
    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    /// Total number of stored entries (always at least 1)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false, a history holds at least its current state
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the depth limit, trimming the oldest entries if needed
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        if limit > 0 && self.entries.len() > limit {
            let excess = (self.entries.len() - limit).min(self.cursor);
            self.entries.drain(..excess);
            self.cursor -= excess;
            // Entries past the cursor are redo states; drop them if still over
            self.entries.truncate(limit.max(self.cursor + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_undo_redo() {
        let mut history = History::new(0, 0);
        assert!(history.push(1));
        assert!(history.push(2));
        assert_eq!(*history.current(), 2);

        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);

        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo_count(), 1);
    }

    #[test]
    fn test_duplicate_is_suppressed() {
        let mut history = History::new(vec![1, 2], 0);
        assert!(!history.push(vec![1, 2]));
        assert_eq!(history.len(), 1);
        assert!(history.push(vec![1, 2, 3]));
        assert!(!history.push(vec![1, 2, 3]));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_push_discards_redo_branch() {
        let mut history = History::new(0, 0);
        history.push(1);
        history.push(2);
        history.undo();
        history.undo();
        history.push(5);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some(&0));
    }

    #[test]
    fn test_clear_keeps_current() {
        let mut history = History::new(0, 0);
        history.push(1);
        history.push(2);
        history.push(3);
        history.undo();

        history.clear();
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), 2);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(0, 3);
        for i in 1..=5 {
            history.push(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(&4));
        assert_eq!(history.undo(), Some(&3));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_set_limit_trims() {
        let mut history = History::new(0, 0);
        for i in 1..=6 {
            history.push(i);
        }
        history.set_limit(2);
        assert_eq!(history.len(), 2);
        assert_eq!(*history.current(), 6);
        assert_eq!(history.undo_count(), 1);
    }
}

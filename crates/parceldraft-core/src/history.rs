//! Linear snapshot history with undo/redo.
//!
//! The history holds full snapshots rather than deltas. Two write paths
//! exist: [`History::push`] records a new undoable step, while
//! [`History::replace`] overwrites the current snapshot in place. Drag and
//! rotate gestures stream their intermediate frames through `replace` and
//! push once on release, so a whole gesture costs one undo step.

/// Maximum number of retained snapshots. Pushing beyond this drops the
/// oldest snapshot.
pub const MAX_HISTORY: usize = 50;

/// A bounded linear history of snapshots of `T`.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    snapshots: Vec<T>,
    cursor: usize,
}

impl<T: Clone> History<T> {
    /// Create a history seeded with one initial snapshot.
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Mutable access to the snapshot at the cursor.
    pub fn current_mut(&mut self) -> &mut T {
        &mut self.snapshots[self.cursor]
    }

    /// Record a new snapshot after the cursor, discarding any redo tail.
    pub fn push(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        if self.snapshots.len() > MAX_HISTORY {
            self.snapshots.remove(0);
        } else {
            self.cursor += 1;
        }
    }

    /// Overwrite the snapshot at the cursor without creating an undo step.
    pub fn replace(&mut self, snapshot: T) {
        self.snapshots[self.cursor] = snapshot;
    }

    /// Step the cursor back. Returns whether a step was taken.
    pub fn undo(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step the cursor forward. Returns whether a step was taken.
    pub fn redo(&mut self) -> bool {
        if self.cursor + 1 < self.snapshots.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_undo_redo() {
        let mut h = History::new("a");
        h.push("b");
        h.push("c");
        assert_eq!(*h.current(), "c");

        assert!(h.undo());
        assert_eq!(*h.current(), "b");
        assert!(h.undo());
        assert_eq!(*h.current(), "a");
        assert!(!h.undo());

        assert!(h.redo());
        assert!(h.redo());
        assert_eq!(*h.current(), "c");
        assert!(!h.redo());
    }

    #[test]
    fn test_push_discards_redo_tail() {
        let mut h = History::new(1);
        h.push(2);
        h.push(3);
        h.undo();
        h.undo();
        assert_eq!(*h.current(), 1);

        h.push(9);
        assert_eq!(*h.current(), 9);
        assert!(!h.redo());
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_replace_is_not_undoable() {
        let mut h = History::new(1);
        h.push(2);
        h.replace(5);
        assert_eq!(*h.current(), 5);

        h.undo();
        assert_eq!(*h.current(), 1);
        h.redo();
        assert_eq!(*h.current(), 5);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut h = History::new(0usize);
        for i in 1..=MAX_HISTORY + 10 {
            h.push(i);
        }
        assert_eq!(h.len(), MAX_HISTORY);
        assert_eq!(*h.current(), MAX_HISTORY + 10);

        // Undo all the way back; the oldest snapshots are gone.
        while h.undo() {}
        assert_eq!(*h.current(), 11);
    }
}

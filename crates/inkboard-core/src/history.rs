//! Snapshot-based undo/redo history.

/// A linear list of full snapshots with a cursor.
///
/// The list is never empty, so `current()` always resolves. New commits
/// discard any redo branch; there is no branching history.
#[derive(Debug, Clone)]
pub struct History<T> {
    versions: Vec<T>,
    index: usize,
    /// Maximum number of versions kept; the oldest are dropped first.
    limit: Option<usize>,
}

impl<T: Clone + Default> Default for History<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> History<T> {
    /// Start a history whose only version is `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            versions: vec![initial],
            index: 0,
            limit: None,
        }
    }

    /// Bound the number of retained versions (minimum 1).
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.map(|l| l.max(1));
        self.enforce_limit();
        self
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &T {
        &self.versions[self.index]
    }

    /// Append `snapshot` after the cursor, discarding any redo branch.
    pub fn commit(&mut self, snapshot: T) {
        self.versions.truncate(self.index + 1);
        self.versions.push(snapshot);
        self.index = self.versions.len() - 1;
        self.enforce_limit();
        log::debug!("History commit: version {} of {}", self.index, self.versions.len());
    }

    /// Overwrite the snapshot at the cursor without growing the list.
    pub fn commit_in_place(&mut self, snapshot: T) {
        self.versions[self.index] = snapshot;
    }

    /// Step back one version. Returns `false` at the oldest version.
    pub fn undo(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        log::debug!("Undo to version {}", self.index);
        true
    }

    /// Step forward one version. Returns `false` at the newest version.
    pub fn redo(&mut self) -> bool {
        if self.index + 1 >= self.versions.len() {
            return false;
        }
        self.index += 1;
        log::debug!("Redo to version {}", self.index);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.versions.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored versions (always at least 1).
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Drop every version and start over from `snapshot`.
    pub fn reset(&mut self, snapshot: T) {
        self.versions.clear();
        self.versions.push(snapshot);
        self.index = 0;
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        if self.versions.len() > limit {
            let excess = self.versions.len() - limit;
            self.versions.drain(..excess);
            self.index = self.index.saturating_sub(excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let history: History<Vec<u32>> = History::default();
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_and_undo_redo() {
        let mut history = History::new(0);
        history.commit(1);
        history.commit(2);
        assert_eq!(*history.current(), 2);

        assert!(history.undo());
        assert_eq!(*history.current(), 1);
        assert!(history.undo());
        assert_eq!(*history.current(), 0);
        assert!(!history.undo());
        assert_eq!(*history.current(), 0);

        assert!(history.redo());
        assert!(history.redo());
        assert!(!history.redo());
        assert_eq!(*history.current(), 2);
    }

    #[test]
    fn test_commit_truncates_redo() {
        let mut history = History::new("empty");
        history.commit("a");
        history.commit("b");
        history.undo();
        history.commit("c");
        assert!(!history.redo());
        assert_eq!(*history.current(), "c");
        assert_eq!(history.len(), 3);
        history.undo();
        assert_eq!(*history.current(), "a");
    }

    #[test]
    fn test_commit_in_place_does_not_grow() {
        let mut history = History::new(0);
        history.commit(1);
        history.commit_in_place(5);
        history.commit_in_place(6);
        assert_eq!(history.len(), 2);
        assert_eq!(*history.current(), 6);
        history.undo();
        assert_eq!(*history.current(), 0);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(0).with_limit(Some(3));
        for v in 1..=5 {
            history.commit(v);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(*history.current(), 5);
        assert!(history.undo());
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(*history.current(), 3);
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(0);
        history.commit(1);
        history.reset(9);
        assert_eq!(history.len(), 1);
        assert_eq!(*history.current(), 9);
        assert!(!history.can_undo());
    }
}

//! Snapshot history (undo/redo) for the editable surface.
//!
//! Each entry is a full copy of the surface markup. A cursor points at the
//! snapshot the surface currently reflects; undo and redo only move the cursor.

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// An immutable full copy of the surface markup at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    markup: String,
}

impl HistorySnapshot {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

/// Bounded, linear (non-branching) snapshot history.
///
/// Invariant: when `snapshots` is non-empty, `cursor < snapshots.len()`.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    snapshots: Vec<HistorySnapshot>,
    cursor: usize,
    max_size: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotHistory {
    /// Create a new history with default max size
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_DEPTH)
    }

    /// Create a new history with specified max size (at least one snapshot)
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record a new snapshot.
    ///
    /// Discards any redo branch after the cursor, appends, then evicts from
    /// the oldest end if over capacity.
    pub fn push(&mut self, markup: impl Into<String>) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(HistorySnapshot::new(markup));
        self.cursor = self.snapshots.len() - 1;

        if self.snapshots.len() > self.max_size {
            let evicted = self.snapshots.len() - self.max_size;
            self.snapshots.drain(..evicted);
            self.cursor -= evicted;
        }
    }

    /// Step back one snapshot. Returns `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward one snapshot. Returns `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.cursor > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.snapshots.is_empty() && self.cursor + 1 < self.snapshots.len()
    }

    /// Snapshot the cursor points at
    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.snapshots.get(self.cursor)
    }

    /// Index of the current snapshot
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = 0;
    }
}

// Undo/redo history for the editor.
//
// Linear snapshot model: every mutation appends one fully-serialized scene
// snapshot after the cursor and prunes whatever redo branch existed beyond
// it. No diffs, no branching. Capped at `DEFAULT_MAX_ENTRIES` snapshots;
// the oldest entry is evicted when the cap is exceeded.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Cap on retained snapshots.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    entries: Vec<String>,
    /// Index of the currently displayed snapshot; `None` iff no entry has
    /// been recorded yet.
    cursor: Option<usize>,

    #[serde(default = "default_max_entries")]
    max_entries: usize,
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_MAX_ENTRIES)
    }

    /// A history with a custom cap. `max_entries` of 0 is nonsensical and
    /// clamped to 1.
    pub fn with_cap(max_entries: usize) -> Self {
        Self {
            entries: vec![],
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Append a snapshot after the cursor, pruning any redo branch.
    ///
    /// When the cap is exceeded the oldest entry is evicted; the cursor
    /// stays on the entry just recorded either way.
    pub fn record(&mut self, snapshot: String) {
        match self.cursor {
            Some(c) => self.entries.truncate(c + 1),
            None => self.entries.clear(),
        }
        self.entries.push(snapshot);

        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
            trace!(cap = self.max_entries, "evicted oldest history entry");
        }

        self.cursor = Some(self.entries.len() - 1);
        debug!(
            entries = self.entries.len(),
            cursor = self.entries.len() - 1,
            "recorded history entry"
        );
    }

    /// Step back one entry. No-op (returns `None`) at the first entry or
    /// when nothing has been recorded.
    pub fn undo(&mut self) -> Option<&str> {
        let c = self.cursor?;
        if c == 0 {
            trace!("undo at history start, ignoring");
            return None;
        }
        self.cursor = Some(c - 1);
        debug!(cursor = c - 1, "undo");
        Some(&self.entries[c - 1])
    }

    /// Step forward one entry. No-op at the last entry.
    pub fn redo(&mut self) -> Option<&str> {
        let c = self.cursor?;
        if c + 1 >= self.entries.len() {
            trace!("redo at history end, ignoring");
            return None;
        }
        self.cursor = Some(c + 1);
        debug!(cursor = c + 1, "redo");
        Some(&self.entries[c + 1])
    }

    /// The snapshot the cursor currently points at.
    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|c| self.entries[c].as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }
}

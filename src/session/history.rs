// SPDX-License-Identifier: MPL-2.0
//! Versioned snapshot history (undo/redo).
//!
//! The stack is the single source of truth for "what image is currently
//! shown": an append/truncate log of immutable snapshots plus a cursor.
//! Every mutation keeps the display-handle ledger balanced by releasing
//! handles through the owned [`HandleStore`] the moment a snapshot leaves
//! the stack.
//!
//! Invariant maintained throughout: the cursor is `None` exactly when the
//! stack is empty, and otherwise a valid index into the entries.

use crate::domain::editing::SnapshotId;
use crate::error::{Error, Result};
use crate::session::handles::{DisplayHandle, HandleStore, InMemoryHandleStore};
use std::sync::Arc;

/// One immutable unit of edit history.
#[derive(Debug)]
pub struct Snapshot {
    id: SnapshotId,
    bytes: Arc<Vec<u8>>,
    handle: Option<DisplayHandle>,
}

impl Snapshot {
    /// Stable identifier, suitable for UI keying.
    #[must_use]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// The encoded image bytes. Never empty.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared reference to the encoded bytes.
    #[must_use]
    pub fn bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    /// The display handle, if one has been derived already.
    #[must_use]
    pub fn handle(&self) -> Option<DisplayHandle> {
        self.handle
    }
}

/// Ordered sequence of snapshots with an undo/redo cursor.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
    next_id: u64,
    handles: Box<dyn HandleStore>,
}

impl HistoryStack {
    /// Creates an empty stack that routes handle lifecycles through
    /// `handles`.
    #[must_use]
    pub fn new(handles: Box<dyn HandleStore>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            next_id: 0,
            handles,
        }
    }

    /// Creates an empty stack backed by an [`InMemoryHandleStore`].
    #[must_use]
    pub fn with_in_memory_handles() -> Self {
        Self::new(Box::new(InMemoryHandleStore::new()))
    }

    /// Number of snapshots in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position, or `None` for an empty stack.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// All snapshots in order (oldest first).
    #[must_use]
    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    /// The currently displayed snapshot.
    #[must_use]
    pub fn current(&self) -> Option<&Snapshot> {
        self.cursor.map(|c| &self.entries[c])
    }

    /// Whether an undo operation is currently possible.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether a redo operation is currently possible.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Appends a snapshot after the cursor, pruning any redo branch first
    /// (and releasing the pruned entries' handles). The cursor moves to
    /// the new top.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for empty bytes; the stack is left
    /// untouched.
    pub fn append(&mut self, bytes: Vec<u8>) -> Result<SnapshotId> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput(
                "history snapshot must have non-empty bytes".to_string(),
            ));
        }

        if let Some(cursor) = self.cursor {
            for evicted in self.entries.drain(cursor + 1..) {
                release_snapshot(self.handles.as_mut(), evicted);
            }
        }

        let id = self.allocate_id();
        self.entries.push(Snapshot {
            id,
            bytes: Arc::new(bytes),
            handle: None,
        });
        self.cursor = Some(self.entries.len() - 1);
        Ok(id)
    }

    /// Overwrites the current snapshot in place, releasing its handle;
    /// the cursor does not move and the stack does not grow. Used for
    /// adjustment previews so a slider drag cannot grow the stack
    /// unboundedly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for empty bytes or an empty stack;
    /// the stack is left untouched.
    pub fn replace_top(&mut self, bytes: Vec<u8>) -> Result<SnapshotId> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput(
                "history snapshot must have non-empty bytes".to_string(),
            ));
        }
        let Some(cursor) = self.cursor else {
            return Err(Error::InvalidInput(
                "cannot replace the top of an empty history".to_string(),
            ));
        };

        let id = self.allocate_id();
        let replaced = std::mem::replace(
            &mut self.entries[cursor],
            Snapshot {
                id,
                bytes: Arc::new(bytes),
                handle: None,
            },
        );
        release_snapshot(self.handles.as_mut(), replaced);
        Ok(id)
    }

    /// Moves the cursor one step back. No-op at the oldest entry.
    pub fn undo(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    /// Moves the cursor one step forward. No-op at the newest entry.
    pub fn redo(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    /// Jumps the cursor to any valid index (thumbnail navigation).
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    /// Releases every handle and empties the stack.
    pub fn reset(&mut self) {
        for evicted in self.entries.drain(..) {
            release_snapshot(self.handles.as_mut(), evicted);
        }
        self.cursor = None;
    }

    /// Atomically replaces the whole stack with externally supplied
    /// entries (a restored session), releasing all prior handles. The
    /// supplied cursor is clamped into bounds. Display handles for the
    /// new entries are derived lazily on first access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `entries` is empty or any
    /// entry has empty bytes; the stack is left untouched.
    pub fn restore_from(
        &mut self,
        entries: Vec<(SnapshotId, Vec<u8>)>,
        cursor: usize,
    ) -> Result<()> {
        if entries.is_empty() {
            return Err(Error::InvalidInput(
                "cannot restore an empty history".to_string(),
            ));
        }
        if entries.iter().any(|(_, bytes)| bytes.is_empty()) {
            return Err(Error::InvalidInput(
                "restored snapshot has empty bytes".to_string(),
            ));
        }

        self.reset();

        let max_id = entries.iter().map(|(id, _)| id.raw()).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);

        self.entries = entries
            .into_iter()
            .map(|(id, bytes)| Snapshot {
                id,
                bytes: Arc::new(bytes),
                handle: None,
            })
            .collect();
        self.cursor = Some(cursor.min(self.entries.len() - 1));
        Ok(())
    }

    /// Returns the current snapshot's display handle, deriving it on
    /// first access.
    pub fn current_display_handle(&mut self) -> Option<DisplayHandle> {
        self.cursor.and_then(|c| self.display_handle_at(c))
    }

    /// Returns the display handle for the snapshot at `index`, deriving
    /// it on first access (thumbnail rendering).
    pub fn display_handle_at(&mut self, index: usize) -> Option<DisplayHandle> {
        let snapshot = self.entries.get_mut(index)?;
        if snapshot.handle.is_none() {
            snapshot.handle = Some(self.handles.create(&snapshot.bytes));
        }
        snapshot.handle
    }
}

impl Drop for HistoryStack {
    fn drop(&mut self) {
        // Process teardown still releases every live handle.
        self.reset();
    }
}

impl HistoryStack {
    fn allocate_id(&mut self) -> SnapshotId {
        let id = SnapshotId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }
}

fn release_snapshot(handles: &mut dyn HandleStore, snapshot: Snapshot) {
    if let Some(handle) = snapshot.handle {
        handles.release(handle);
    }
}

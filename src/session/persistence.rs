// SPDX-License-Identifier: MPL-2.0
//! Session snapshot codec and debounced autosave.
//!
//! The persisted record is a minimal projection of the edit session:
//! history entries (identifiers plus raw bytes), the cursor, and the
//! viewport transform. Display handles are ephemeral and never persisted.
//! Records are CBOR-encoded and written through the [`BlobStore`] port,
//! debounced so bursts of changes coalesce into a single write.

use crate::application::port::BlobStore;
use crate::config::defaults::SESSION_BLOB_KEY;
use crate::domain::editing::SnapshotId;
use crate::error::{Error, Result};
use crate::session::history::HistoryStack;
use crate::session::viewport::ViewportState;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

// =============================================================================
// Snapshot record
// =============================================================================

/// One persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub id: SnapshotId,
    pub bytes: Vec<u8>,
}

/// The full persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub entries: Vec<SessionEntry>,
    pub cursor: usize,
    pub viewport: ViewportState,
}

impl SessionSnapshot {
    /// Projects the durable parts of a history stack and viewport into a
    /// persistable record. Returns `None` for an empty stack; an empty
    /// session is represented by the absence of a stored record.
    #[must_use]
    pub fn capture(stack: &HistoryStack, viewport: ViewportState) -> Option<Self> {
        let cursor = stack.cursor()?;
        let entries = stack
            .entries()
            .iter()
            .map(|snapshot| SessionEntry {
                id: snapshot.id(),
                bytes: snapshot.bytes().to_vec(),
            })
            .collect();
        Some(Self {
            entries,
            cursor,
            viewport,
        })
    }

    /// Drops entries with empty bytes (tolerated as partial corruption)
    /// and clamps the cursor into bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] when no usable entry survives.
    pub fn sanitized(mut self) -> Result<Self> {
        self.entries.retain(|entry| !entry.bytes.is_empty());
        if self.entries.is_empty() {
            return Err(Error::Persistence(
                "restored session has no usable entries".to_string(),
            ));
        }
        self.cursor = self.cursor.min(self.entries.len() - 1);
        Ok(self)
    }
}

/// Encodes a snapshot to CBOR bytes.
pub fn encode_snapshot(snapshot: &SessionSnapshot) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    ciborium::into_writer(snapshot, &mut buffer)
        .map_err(|e| Error::Persistence(format!("failed to encode session: {e}")))?;
    Ok(buffer)
}

/// Decodes a snapshot from CBOR bytes.
pub fn decode_snapshot(bytes: &[u8]) -> Result<SessionSnapshot> {
    ciborium::from_reader(bytes)
        .map_err(|e| Error::Persistence(format!("failed to decode session: {e}")))
}

// =============================================================================
// SessionStore
// =============================================================================

/// Blob-store wrapper that speaks [`SessionSnapshot`].
///
/// Persistence is best-effort: write and delete failures are logged and
/// swallowed so a flaky store never interrupts editing.
#[derive(Debug, Clone)]
pub struct SessionStore<B> {
    store: B,
    key: String,
}

impl<B: BlobStore> SessionStore<B> {
    /// Wraps `store` using the default session key.
    #[must_use]
    pub fn new(store: B) -> Self {
        Self::with_key(store, SESSION_BLOB_KEY)
    }

    /// Wraps `store` using a custom key.
    #[must_use]
    pub fn with_key(store: B, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// Loads the persisted session, if any. Absent and unreadable records
    /// both yield `None`; an unreadable record is deleted so the next
    /// startup is clean.
    pub async fn load(&self) -> Option<SessionSnapshot> {
        let bytes = match self.store.get(&self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                eprintln!("[WARN] failed to read persisted session: {e}");
                return None;
            }
        };

        match decode_snapshot(&bytes).and_then(SessionSnapshot::sanitized) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                eprintln!("[WARN] discarding unreadable persisted session: {e}");
                self.discard().await;
                None
            }
        }
    }

    /// Writes `snapshot` to the store, or deletes the record when given
    /// `None`.
    pub async fn persist(&self, snapshot: Option<&SessionSnapshot>) {
        match snapshot {
            Some(snapshot) => match encode_snapshot(snapshot) {
                Ok(bytes) => {
                    if let Err(e) = self.store.put(&self.key, bytes).await {
                        eprintln!("[WARN] failed to persist session: {e}");
                    }
                }
                Err(e) => eprintln!("[WARN] failed to encode session: {e}"),
            },
            None => self.discard().await,
        }
    }

    /// Deletes the stored record, logging failures.
    pub async fn discard(&self) {
        if let Err(e) = self.store.delete(&self.key).await {
            eprintln!("[WARN] failed to delete persisted session: {e}");
        }
    }
}

// =============================================================================
// Autosaver
// =============================================================================

/// Debounced writer for session snapshots.
///
/// Each call to [`Autosaver::schedule`] replaces any pending write; the
/// latest state is persisted once no new change has arrived for the
/// debounce window. Dropping the handle flushes the pending write before
/// the task exits.
#[derive(Debug)]
pub struct Autosaver {
    commands: mpsc::UnboundedSender<Option<SessionSnapshot>>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Spawns the autosave task writing through `store` with the given
    /// debounce window.
    #[must_use]
    pub fn spawn<B>(store: SessionStore<B>, debounce: Duration) -> Self
    where
        B: BlobStore + Send + Sync + 'static,
    {
        let (commands, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, receiver, debounce));
        Self { commands, task }
    }

    /// Schedules `snapshot` for persistence (or deletion, for `None`),
    /// replacing any not-yet-written previous schedule.
    pub fn schedule(&self, snapshot: Option<SessionSnapshot>) {
        if self.commands.send(snapshot).is_err() {
            eprintln!("[WARN] autosave task is gone; session change not persisted");
        }
    }

    /// Closes the command channel and waits for the final flush.
    pub async fn shutdown(self) {
        drop(self.commands);
        if self.task.await.is_err() {
            eprintln!("[WARN] autosave task panicked during shutdown");
        }
    }
}

async fn run<B: BlobStore>(
    store: SessionStore<B>,
    mut receiver: mpsc::UnboundedReceiver<Option<SessionSnapshot>>,
    debounce: Duration,
) {
    while let Some(mut pending) = receiver.recv().await {
        // Coalesce: keep absorbing newer states until a quiet period.
        loop {
            match tokio::time::timeout(debounce, receiver.recv()).await {
                Ok(Some(newer)) => pending = newer,
                Ok(None) => {
                    // Channel closed; flush what we have and exit.
                    store.persist(pending.as_ref()).await;
                    return;
                }
                Err(_) => break,
            }
        }
        store.persist(pending.as_ref()).await;
    }
}

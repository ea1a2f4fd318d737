// SPDX-License-Identifier: MPL-2.0
//! Display-handle lifecycle management.
//!
//! A display handle is a short-lived, revocable reference to renderable
//! image data, derived from a snapshot's encoded bytes (the moral
//! equivalent of an object URL). Handles are created lazily and must be
//! released exactly once when their snapshot leaves the history stack.
//! The store keeps create/release counters so leak-freedom is directly
//! assertable in tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque identifier for a live display handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(u64);

impl DisplayHandle {
    /// Returns the raw handle value (useful for host-side registries).
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Port for creating and revoking display handles.
///
/// The history stack owns one of these and routes every snapshot eviction
/// through [`HandleStore::release`], so an implementation backed by real
/// GPU textures or object URLs frees resources deterministically.
pub trait HandleStore: fmt::Debug + Send {
    /// Derives a new handle from encoded snapshot bytes.
    fn create(&mut self, bytes: &Arc<Vec<u8>>) -> DisplayHandle;

    /// Revokes a handle. Each handle is released exactly once; releasing
    /// an unknown handle is a bookkeeping bug in the caller.
    fn release(&mut self, handle: DisplayHandle);
}

/// In-memory [`HandleStore`]: an arena of live handles keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryHandleStore {
    live: HashMap<u64, Arc<Vec<u8>>>,
    next_id: u64,
    created: u64,
    released: u64,
}

impl InMemoryHandleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a live handle back to its bytes, or `None` after release.
    #[must_use]
    pub fn resolve(&self, handle: DisplayHandle) -> Option<Arc<Vec<u8>>> {
        self.live.get(&handle.raw()).cloned()
    }

    /// Number of handles currently live.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total handles created over the store's lifetime.
    #[must_use]
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Total handles released over the store's lifetime.
    #[must_use]
    pub fn released_count(&self) -> u64 {
        self.released
    }
}

impl HandleStore for InMemoryHandleStore {
    fn create(&mut self, bytes: &Arc<Vec<u8>>) -> DisplayHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.created += 1;
        self.live.insert(id, Arc::clone(bytes));
        DisplayHandle(id)
    }

    fn release(&mut self, handle: DisplayHandle) {
        if self.live.remove(&handle.raw()).is_some() {
            self.released += 1;
        } else {
            debug_assert!(false, "released unknown display handle {}", handle.raw());
            eprintln!(
                "[WARN] released unknown display handle {} (double release?)",
                handle.raw()
            );
        }
    }
}

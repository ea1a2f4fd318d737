// SPDX-License-Identifier: MPL-2.0
//! Edit session orchestration.
//!
//! [`EditSession`] ties the history stack, the viewport, the adjustment
//! worker, and the remote-edit port together into one state machine. The
//! history stack stays the single source of truth for the displayed
//! image; every edit path (load, crop, remote edit, adjustment preview)
//! goes through it.

pub mod handles;
pub mod history;
pub mod persistence;
pub mod viewport;

pub use handles::{DisplayHandle, HandleStore, InMemoryHandleStore};
pub use history::{HistoryStack, Snapshot};
pub use persistence::{Autosaver, SessionEntry, SessionSnapshot, SessionStore};
pub use viewport::{PanEffect, PointerMessage, ViewPoint, Viewport, ViewportState};

use crate::application::port::RemoteEditor;
use crate::config::EngineConfig;
use crate::domain::editing::{Hotspot, SequenceId, SnapshotId};
use crate::domain::media::RawImage;
use crate::error::{Error, Result};
use crate::media::adjustments::AdjustmentParams;
use crate::media::image_transform::{self, CropRect};
use crate::media::worker::{AdjustmentRequest, AdjustmentResponse, AdjustmentWorker};

// =============================================================================
// AdjustmentOutcome
// =============================================================================

/// What happened to one worker response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentOutcome {
    /// The response carried the latest sequence and its result now sits
    /// at the top of the history.
    Applied {
        id: SnapshotId,
        sequence: SequenceId,
    },
    /// The response was superseded by a newer request; its payload was
    /// discarded.
    Stale { sequence: SequenceId },
}

// =============================================================================
// EditSession
// =============================================================================

/// The non-destructive edit-state engine for a single image.
///
/// Must be created inside a tokio runtime (it owns a spawned adjustment
/// worker). All mutations are synchronous and single-threaded; the only
/// asynchrony is waiting on the worker and on the remote-edit port.
#[derive(Debug)]
pub struct EditSession {
    history: HistoryStack,
    viewport: Viewport,
    worker: AdjustmentWorker,
    /// Tag of the most recently issued adjustment request. Responses
    /// carrying any other tag are discarded. `None` while no preview
    /// cycle is active.
    latest_sequence: Option<SequenceId>,
    next_sequence: SequenceId,
    adjusting: bool,
    /// Committed pixels the current preview cycle starts from. Sliders
    /// carry absolute intensities, so every tick re-applies to this base
    /// instead of compounding.
    preview_base: Option<RawImage>,
    native_size: Option<(u32, u32)>,
    hotspot: Option<Hotspot>,
}

impl EditSession {
    /// Creates an empty session with the given configuration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            history: HistoryStack::with_in_memory_handles(),
            viewport: Viewport::new(config),
            worker: AdjustmentWorker::spawn(),
            latest_sequence: None,
            next_sequence: SequenceId::initial(),
            adjusting: false,
            preview_base: None,
            native_size: None,
            hotspot: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The history stack.
    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// The viewport transform.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport access for pointer and wheel input.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Whether an adjustment request is in flight.
    #[must_use]
    pub fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    /// Whether a started preview cycle has not been committed yet.
    #[must_use]
    pub fn has_uncommitted_preview(&self) -> bool {
        self.preview_base.is_some()
    }

    /// Native resolution of the current image, when known.
    #[must_use]
    pub fn native_size(&self) -> Option<(u32, u32)> {
        self.native_size
    }

    /// The currently selected hotspot, if any.
    #[must_use]
    pub fn hotspot(&self) -> Option<Hotspot> {
        self.hotspot
    }

    /// Display handle for the current snapshot, derived lazily.
    pub fn current_display_handle(&mut self) -> Option<DisplayHandle> {
        self.history.current_display_handle()
    }

    // =========================================================================
    // Image lifecycle
    // =========================================================================

    /// Starts a fresh session from encoded image bytes, discarding all
    /// prior history and resetting the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for empty or undecodable bytes;
    /// the existing session state is left untouched.
    pub fn load_image(&mut self, bytes: Vec<u8>) -> Result<SnapshotId> {
        let size = image_transform::probe_dimensions(&bytes)?;

        self.history.reset();
        self.viewport.reset();
        self.end_preview_cycle();
        self.hotspot = None;
        self.native_size = Some(size);
        self.history.append(bytes)
    }

    /// Crops the current image and appends the result as a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when no image is loaded or the
    /// rectangle does not fit the image; history is untouched on failure.
    pub fn apply_crop(&mut self, rect: CropRect) -> Result<SnapshotId> {
        let source = self.current_bytes()?;
        let cropped = image_transform::crop_encoded(&source, &rect)?;

        self.end_preview_cycle();
        self.hotspot = None;
        self.native_size = Some((rect.width, rect.height));
        self.history.append(cropped)
    }

    /// Sends the current image through the remote-edit port and appends
    /// the result. Any selected hotspot is forwarded and then cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteEdit`] verbatim on collaborator failure and
    /// [`Error::InvalidInput`] when no image is loaded or the returned
    /// bytes do not decode; history is untouched on every failure path.
    pub async fn apply_remote_edit<R: RemoteEditor>(
        &mut self,
        editor: &R,
        instruction: &str,
    ) -> Result<SnapshotId> {
        let source = self.current_bytes()?;
        let edited = editor
            .edit_image(&source, instruction, self.hotspot)
            .await
            .map_err(Error::RemoteEdit)?;
        let size = image_transform::probe_dimensions(&edited)?;

        self.end_preview_cycle();
        self.hotspot = None;
        self.native_size = Some(size);
        self.history.append(edited)
    }

    // =========================================================================
    // Adjustment previews
    // =========================================================================

    /// Issues an adjustment preview request to the worker and claims the
    /// latest-sequence slot. The first request of a cycle decodes the
    /// committed top snapshot as the preview base; later requests reuse
    /// it, so intensities are absolute within the cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when no image is loaded or the
    /// current snapshot does not decode, and [`Error::Worker`] when the
    /// worker task is gone.
    pub fn request_adjustment(&mut self, params: AdjustmentParams) -> Result<SequenceId> {
        if self.preview_base.is_none() {
            let bytes = self.current_bytes()?;
            self.preview_base = Some(image_transform::decode_image(&bytes)?);
        }
        let base = self
            .preview_base
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("no preview base".to_string()))?;

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.next();

        self.worker.submit(AdjustmentRequest {
            pixels: base.rgba_bytes_arc(),
            width: base.width(),
            height: base.height(),
            params,
            sequence,
        })?;

        self.latest_sequence = Some(sequence);
        self.adjusting = true;
        Ok(sequence)
    }

    /// Consumes one worker response. The busy flag clears on every
    /// response, matching or not; only a response carrying the latest
    /// issued sequence may touch the history, where it replaces the top
    /// snapshot in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Worker`] when the latest request itself failed;
    /// the preview stays at its last good state.
    pub fn handle_adjustment_response(
        &mut self,
        response: AdjustmentResponse,
    ) -> Result<AdjustmentOutcome> {
        self.adjusting = false;

        if self.latest_sequence != Some(response.sequence) {
            return Ok(AdjustmentOutcome::Stale {
                sequence: response.sequence,
            });
        }

        let image = response.result.map_err(Error::Worker)?;
        let encoded = image_transform::encode_png(&image)?;
        let id = self.history.replace_top(encoded)?;
        Ok(AdjustmentOutcome::Applied {
            id,
            sequence: response.sequence,
        })
    }

    /// Waits for the next worker response and consumes it. Returns `None`
    /// once the worker has shut down.
    pub async fn next_adjustment_outcome(&mut self) -> Option<Result<AdjustmentOutcome>> {
        let response = self.worker.recv().await?;
        Some(self.handle_adjustment_response(response))
    }

    /// Ends the preview cycle, fixing the current top snapshot as the
    /// committed state. The next adjustment request starts a new cycle
    /// from it.
    pub fn commit_adjustments(&mut self) {
        self.end_preview_cycle();
    }

    // =========================================================================
    // History navigation
    // =========================================================================

    /// Steps one snapshot back. Ends any preview cycle.
    pub fn undo(&mut self) -> bool {
        self.end_preview_cycle();
        self.undo_redo_common(|h| h.undo())
    }

    /// Steps one snapshot forward. Ends any preview cycle.
    pub fn redo(&mut self) -> bool {
        self.end_preview_cycle();
        self.undo_redo_common(|h| h.redo())
    }

    /// Jumps to any valid history index. Ends any preview cycle.
    pub fn go_to(&mut self, index: usize) -> bool {
        self.end_preview_cycle();
        self.undo_redo_common(|h| h.go_to(index))
    }

    /// Clears the whole session back to the empty state.
    pub fn reset(&mut self) {
        self.history.reset();
        self.viewport.reset();
        self.end_preview_cycle();
        self.hotspot = None;
        self.native_size = None;
    }

    fn undo_redo_common(&mut self, op: impl FnOnce(&mut HistoryStack) -> bool) -> bool {
        let moved = op(&mut self.history);
        if moved {
            self.hotspot = None;
            self.refresh_native_size();
        }
        moved
    }

    // =========================================================================
    // Hotspot selection
    // =========================================================================

    /// Maps a view-space click to a native-resolution hotspot and stores
    /// it for the next remote edit. Clicks outside the displayed image
    /// clear the selection.
    pub fn select_hotspot(
        &mut self,
        point: ViewPoint,
        displayed: (u32, u32),
    ) -> Option<Hotspot> {
        let native = self.native_size?;
        self.hotspot = self.viewport.click_to_hotspot(point, displayed, native);
        self.hotspot
    }

    /// Clears any selected hotspot.
    pub fn clear_hotspot(&mut self) {
        self.hotspot = None;
    }

    // =========================================================================
    // Session persistence
    // =========================================================================

    /// Projects the durable session state, or `None` when the history is
    /// empty.
    #[must_use]
    pub fn capture_session(&self) -> Option<SessionSnapshot> {
        SessionSnapshot::capture(&self.history, self.viewport.state())
    }

    /// Replaces the whole session with a restored snapshot, rehydrating
    /// history, cursor, and viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] or [`Error::InvalidInput`] when no
    /// usable entry survives validation; the session is untouched then.
    pub fn restore_session(&mut self, snapshot: SessionSnapshot) -> Result<()> {
        let snapshot = snapshot.sanitized()?;
        let entries = snapshot
            .entries
            .into_iter()
            .map(|entry| (entry.id, entry.bytes))
            .collect();
        self.history.restore_from(entries, snapshot.cursor)?;

        self.viewport.restore(snapshot.viewport);
        self.end_preview_cycle();
        self.hotspot = None;
        self.refresh_native_size();
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn current_bytes(&self) -> Result<Vec<u8>> {
        self.history
            .current()
            .map(|snapshot| snapshot.bytes().to_vec())
            .ok_or_else(|| Error::InvalidInput("no image loaded".to_string()))
    }

    /// Drops the preview base and releases the latest-sequence slot so
    /// any still in-flight response is discarded on arrival. The busy
    /// flag stays set until that response lands.
    fn end_preview_cycle(&mut self) {
        self.preview_base = None;
        self.latest_sequence = None;
    }

    fn refresh_native_size(&mut self) {
        self.native_size = self
            .history
            .current()
            .and_then(|snapshot| image_transform::probe_dimensions(snapshot.bytes()).ok());
    }
}

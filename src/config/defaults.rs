// SPDX-License-Identifier: MPL-2.0
//! Default values for engine configuration.
//!
//! Centralizes all tunable constants so bounds live in exactly one place.

use std::time::Duration;

// ==========================================================================
// Viewport
// ==========================================================================

/// Minimum viewport scale (10% of displayed size).
pub const MIN_VIEW_SCALE: f32 = 0.1;

/// Maximum viewport scale (800% of displayed size).
pub const MAX_VIEW_SCALE: f32 = 8.0;

/// Neutral viewport scale (image shown at displayed size).
pub const DEFAULT_VIEW_SCALE: f32 = 1.0;

/// Scale change per unit of wheel delta.
///
/// A typical mouse wheel notch reports a delta around 100-120 units, so one
/// notch moves the scale by roughly half a step.
pub const WHEEL_ZOOM_SENSITIVITY: f32 = 0.005;

// ==========================================================================
// Session persistence
// ==========================================================================

/// Quiet period after the last change before the session snapshot is
/// written. Bursts of changes (slider drags, pan/zoom) coalesce into a
/// single write.
pub const SESSION_SAVE_DEBOUNCE: Duration = Duration::from_millis(800);

/// Key under which the session snapshot is stored in the blob store.
pub const SESSION_BLOB_KEY: &str = "darkroom-session";

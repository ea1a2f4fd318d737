// SPDX-License-Identifier: MPL-2.0
//! Editing newtypes.
//!
//! This module provides type-safe wrappers for editing values,
//! ensuring they are always within valid ranges.

use serde::{Deserialize, Serialize};

// =============================================================================
// Adjustment Bounds
// =============================================================================

/// Adjustment bounds (-100 to +100).
pub mod adjustment_bounds {
    /// Minimum adjustment value.
    pub const MIN: i32 = -100;
    /// Maximum adjustment value.
    pub const MAX: i32 = 100;
    /// Default (neutral) adjustment value.
    pub const DEFAULT: i32 = 0;
}

// =============================================================================
// AdjustmentPercent
// =============================================================================

/// Adjustment intensity, guaranteed to be within valid range (-100 to +100).
///
/// This type ensures that adjustment values are always valid, eliminating
/// the need for manual clamping at usage sites. A value of 0 means no
/// adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentPercent(i32);

impl AdjustmentPercent {
    /// Creates a new adjustment value, clamping to the valid range.
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(value.clamp(adjustment_bounds::MIN, adjustment_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Returns the value as a fraction of full intensity (-1.0 to 1.0).
    #[must_use]
    pub fn as_fraction(self) -> f32 {
        self.0 as f32 / 100.0
    }

    /// Returns whether this represents no adjustment (value is 0).
    #[must_use]
    pub fn is_neutral(self) -> bool {
        self.0 == adjustment_bounds::DEFAULT
    }

    /// Returns whether the adjustment is at the minimum value.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= adjustment_bounds::MIN
    }

    /// Returns whether the adjustment is at the maximum value.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= adjustment_bounds::MAX
    }
}

// =============================================================================
// SnapshotId
// =============================================================================

/// Stable identifier for a history snapshot.
///
/// Identifiers are allocated monotonically by the history stack and survive
/// session restore, so hosts can use them as UI keys (thumbnail lists,
/// selection state) without churn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(u64);

impl SnapshotId {
    /// Wraps a raw identifier (used when restoring a persisted session).
    #[must_use]
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

// =============================================================================
// SequenceId
// =============================================================================

/// Monotonically increasing tag identifying the most recent of several
/// concurrent asynchronous requests.
///
/// The consumer of worker responses keeps the latest issued `SequenceId` and
/// discards any response tagged with an older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(u64);

impl SequenceId {
    /// The sequence value before any request has been issued.
    #[must_use]
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the next sequence value.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

// =============================================================================
// Tests
// =============================================================================

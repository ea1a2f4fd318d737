// SPDX-License-Identifier: MPL-2.0
//! Editing domain types.

pub mod newtypes;
pub mod types;

pub use newtypes::{adjustment_bounds, AdjustmentPercent, SequenceId, SnapshotId};
pub use types::Hotspot;

// SPDX-License-Identifier: MPL-2.0
//! Pixel-level media handling: color math, the adjustment pipeline, codec
//! helpers for snapshot bytes, and the background worker.

pub mod adjustments;
pub mod color;
pub mod image_transform;
pub mod worker;

pub use adjustments::{apply_adjustments, AdjustmentParams};
pub use image_transform::CropRect;
pub use worker::{AdjustmentRequest, AdjustmentResponse, AdjustmentWorker};

// SPDX-License-Identifier: MPL-2.0
//! Core editing types shared between the session and the ports.

use serde::{Deserialize, Serialize};

/// An image-space coordinate marking where a localized edit instruction
/// should apply, expressed in the full-resolution source image's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Horizontal position in native image pixels.
    pub x: u32,
    /// Vertical position in native image pixels.
    pub y: u32,
}

impl Hotspot {
    /// Creates a hotspot at the given native pixel position.
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Core media types for the domain layer.
//!
//! These types represent pure pixel data without any presentation
//! dependencies.

use crate::error::{Error, Result};
use std::sync::Arc;

/// Raw image data without presentation dependencies.
///
/// This is the domain representation of an image: dimensions plus an RGBA
/// pixel buffer (4 bytes per pixel). Presentation layers convert this to
/// framework-specific handles through the display-handle store.
///
/// # Example
///
/// ```
/// use darkroom_core::domain::media::RawImage;
///
/// let pixels = vec![255u8; 100 * 100 * 4]; // 100x100 RGBA
/// let image = RawImage::from_rgba(100, 100, pixels).unwrap();
///
/// assert_eq!(image.width(), 100);
/// assert_eq!(image.height(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    rgba_bytes: Arc<Vec<u8>>,
}

impl RawImage {
    /// Creates a new `RawImage` from dimensions and shared RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when either dimension is zero or the
    /// pixel data length does not match `width * height * 4`. Malformed
    /// buffers are rejected here so no downstream code needs to re-check.
    pub fn new(width: u32, height: u32, rgba_bytes: Arc<Vec<u8>>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }

        let expected_len = (width as usize) * (height as usize) * 4;
        if rgba_bytes.len() != expected_len {
            return Err(Error::InvalidInput(format!(
                "RGBA data length mismatch: expected {expected_len}, got {}",
                rgba_bytes.len()
            )));
        }

        Ok(Self {
            width,
            height,
            rgba_bytes,
        })
    }

    /// Creates a new `RawImage` from dimensions and owned RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Same conditions as [`RawImage::new`].
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Result<Self> {
        Self::new(width, height, Arc::new(rgba_bytes))
    }

    /// Returns the image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Returns the shared reference to the RGBA pixel data.
    #[must_use]
    pub fn rgba_bytes_arc(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.rgba_bytes)
    }

    /// Returns the total number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl PartialEq for RawImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.rgba_bytes == other.rgba_bytes
    }
}

impl Eq for RawImage {}

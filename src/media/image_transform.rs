// SPDX-License-Identifier: MPL-2.0
//! Decode, crop, and re-encode helpers for history snapshot bytes.
//!
//! History entries store encoded image bytes (whatever format the user
//! loaded, PNG for everything the engine derives). These helpers bridge
//! between those bytes and the RGBA buffers the adjustment pipeline works
//! on.

use crate::domain::media::RawImage;
use crate::error::{Error, Result};
use image_rs::{GenericImageView, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;

// ==========================================================================
// Crop Rectangle
// ==========================================================================

/// An axis-aligned crop region in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels (must be non-zero).
    pub width: u32,
    /// Height in pixels (must be non-zero).
    pub height: u32,
}

impl CropRect {
    /// Creates a crop rectangle.
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Checks the rectangle against the image bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a zero-area rectangle or one that
    /// extends past the image edges.
    pub fn validate_within(&self, image_width: u32, image_height: u32) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidInput(format!(
                "crop area must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }

        let fits_x = self
            .x
            .checked_add(self.width)
            .is_some_and(|right| right <= image_width);
        let fits_y = self
            .y
            .checked_add(self.height)
            .is_some_and(|bottom| bottom <= image_height);

        if !fits_x || !fits_y {
            return Err(Error::InvalidInput(format!(
                "crop {}x{}+{}+{} exceeds image bounds {image_width}x{image_height}",
                self.width, self.height, self.x, self.y
            )));
        }

        Ok(())
    }
}

// ==========================================================================
// Decode / Encode
// ==========================================================================

/// Reads only the dimensions of an encoded image, validating the bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for empty or undecodable bytes.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.is_empty() {
        return Err(Error::InvalidInput("empty image bytes".to_string()));
    }

    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| Error::InvalidInput(format!("unreadable image bytes: {err}")))?
        .into_dimensions()
        .map_err(|err| Error::InvalidInput(format!("undecodable image bytes: {err}")))
}

/// Decodes encoded image bytes into an RGBA buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for empty or undecodable bytes.
pub fn decode_image(bytes: &[u8]) -> Result<RawImage> {
    if bytes.is_empty() {
        return Err(Error::InvalidInput("empty image bytes".to_string()));
    }

    let decoded = image_rs::load_from_memory(bytes)
        .map_err(|err| Error::InvalidInput(format!("undecodable image bytes: {err}")))?;
    let (width, height) = decoded.dimensions();
    RawImage::from_rgba(width, height, decoded.to_rgba8().into_raw())
}

/// Encodes an RGBA buffer as PNG bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the buffer cannot be encoded.
pub fn encode_png(image: &RawImage) -> Result<Vec<u8>> {
    let rgba = RgbaImage::from_raw(image.width(), image.height(), image.rgba_bytes().to_vec())
        .ok_or_else(|| Error::InvalidInput("pixel buffer does not match dimensions".to_string()))?;

    let mut bytes = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| Error::InvalidInput(format!("PNG encoding failed: {err}")))?;
    Ok(bytes)
}

/// Crops encoded image bytes and re-encodes the result as PNG.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the bytes cannot be decoded or the
/// rectangle does not fit inside the image.
pub fn crop_encoded(bytes: &[u8], rect: &CropRect) -> Result<Vec<u8>> {
    let decoded = image_rs::load_from_memory(bytes)
        .map_err(|err| Error::InvalidInput(format!("undecodable image bytes: {err}")))?;
    let (width, height) = decoded.dimensions();
    rect.validate_within(width, height)?;

    let cropped = decoded.crop_imm(rect.x, rect.y, rect.width, rect.height);

    let mut out = Vec::new();
    cropped
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|err| Error::InvalidInput(format!("PNG encoding failed: {err}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_test_image(width: u32, height: u32) -> Vec<u8> {
        let rgba = RgbaImage::from_fn(width, height, |x, y| {
            image_rs::Rgba([(x % 256) as u8, (y % 256) as u8, 60, 255])
        });
        let mut bytes = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn probe_reads_dimensions() {
        let bytes = encoded_test_image(12, 7);
        assert_eq!(probe_dimensions(&bytes).unwrap(), (12, 7));
    }

    #[test]
    fn probe_rejects_empty_and_garbage_bytes() {
        assert!(probe_dimensions(&[]).is_err());
        assert!(probe_dimensions(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn decode_produces_rgba_buffer() {
        let bytes = encoded_test_image(4, 3);
        let image = decode_image(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (4, 3));
        assert_eq!(image.rgba_bytes().len(), 4 * 3 * 4);
    }

    #[test]
    fn encode_round_trips_pixels() {
        let bytes = encoded_test_image(5, 5);
        let image = decode_image(&bytes).unwrap();
        let reencoded = encode_png(&image).unwrap();
        assert_eq!(decode_image(&reencoded).unwrap(), image);
    }

    #[test]
    fn crop_produces_requested_dimensions() {
        let bytes = encoded_test_image(10, 8);
        let cropped = crop_encoded(&bytes, &CropRect::new(2, 1, 6, 4)).unwrap();
        assert_eq!(probe_dimensions(&cropped).unwrap(), (6, 4));
    }

    #[test]
    fn crop_rejects_zero_area_rect() {
        let bytes = encoded_test_image(10, 8);
        assert!(crop_encoded(&bytes, &CropRect::new(0, 0, 0, 4)).is_err());
    }

    #[test]
    fn crop_rejects_out_of_bounds_rect() {
        let bytes = encoded_test_image(10, 8);
        assert!(crop_encoded(&bytes, &CropRect::new(6, 0, 6, 4)).is_err());
        assert!(crop_encoded(&bytes, &CropRect::new(0, 7, 2, 2)).is_err());
    }

    #[test]
    fn crop_rect_overflow_is_rejected() {
        let rect = CropRect::new(u32::MAX, 0, 2, 2);
        assert!(rect.validate_within(10, 10).is_err());
    }
}

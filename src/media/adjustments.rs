// SPDX-License-Identifier: MPL-2.0
//! Slider-driven tonal and color adjustments.
//!
//! [`apply_adjustments`] runs a fixed, ordered chain over every pixel of an
//! RGBA buffer: exposure, brightness/contrast, then the HSL-space steps
//! (highlights, shadows, vibrance, saturation). The chain is deterministic
//! and pure, so it is safe to run on the background worker while sliders
//! keep moving on the interactive side.

use crate::domain::editing::AdjustmentPercent;
use crate::domain::media::RawImage;
use crate::error::Result;
use crate::media::color::{ease_in_out, hsl_to_rgb, rgb_to_hsl};
use serde::{Deserialize, Serialize};

/// All slider intensities for one adjustment pass.
///
/// Each value is clamped to -100..=100 by its type; the default (all zeros)
/// is the identity and leaves the buffer untouched byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdjustmentParams {
    /// Exposure in relative stops: each channel is multiplied by
    /// `2^(exposure/100)`.
    pub exposure: AdjustmentPercent,
    /// Flat brightness offset added after the contrast ramp.
    pub brightness: AdjustmentPercent,
    /// Contrast ramp around the mid-gray point (128).
    pub contrast: AdjustmentPercent,
    /// Lightness shift weighted toward already-bright pixels.
    pub highlights: AdjustmentPercent,
    /// Lightness shift weighted toward already-dark pixels.
    pub shadows: AdjustmentPercent,
    /// Saturation boost that weakens as saturation approaches full.
    pub vibrance: AdjustmentPercent,
    /// Plain multiplicative saturation.
    pub saturation: AdjustmentPercent,
}

impl AdjustmentParams {
    /// Returns true when every intensity is zero (the pristine state).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Resets every intensity to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true when any of the HSL-space steps is active.
    fn needs_hsl_pass(&self) -> bool {
        !self.highlights.is_neutral()
            || !self.shadows.is_neutral()
            || !self.vibrance.is_neutral()
            || !self.saturation.is_neutral()
    }
}

/// Applies the adjustment chain to an RGBA buffer.
///
/// Alpha is passed through untouched. Identity parameters return a buffer
/// equal to the input byte for byte.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidInput`] when the buffer length does
/// not match `width * height * 4` or a dimension is zero. The input is never
/// mutated.
pub fn apply_adjustments(
    rgba: &[u8],
    width: u32,
    height: u32,
    params: &AdjustmentParams,
) -> Result<Vec<u8>> {
    // Validates dimensions and buffer length up front.
    let _ = RawImage::from_rgba(width, height, rgba.to_vec())?;

    let mut out = rgba.to_vec();
    if params.is_identity() {
        return Ok(out);
    }

    let exposure_factor = 2.0f32.powf(params.exposure.as_fraction());
    let contrast_factor = 1.0 + params.contrast.as_fraction();
    let brightness_offset = params.brightness.as_fraction() * 100.0;
    let needs_hsl = params.needs_hsl_pass();

    for pixel in out.chunks_exact_mut(4) {
        let mut r = f32::from(pixel[0]);
        let mut g = f32::from(pixel[1]);
        let mut b = f32::from(pixel[2]);

        // Exposure.
        if !params.exposure.is_neutral() {
            r *= exposure_factor;
            g *= exposure_factor;
            b *= exposure_factor;
        }

        // Brightness and contrast around mid-gray, clamped back to bytes.
        r = ((r - 128.0) * contrast_factor + 128.0 + brightness_offset).clamp(0.0, 255.0);
        g = ((g - 128.0) * contrast_factor + 128.0 + brightness_offset).clamp(0.0, 255.0);
        b = ((b - 128.0) * contrast_factor + 128.0 + brightness_offset).clamp(0.0, 255.0);

        let (mut r8, mut g8, mut b8) = (
            r.round() as u8,
            g.round() as u8,
            b.round() as u8,
        );

        if needs_hsl {
            let (h, mut s, mut l) = rgb_to_hsl(r8, g8, b8);

            if !params.highlights.is_neutral() {
                l += ease_in_out(l) * params.highlights.as_fraction();
            }
            if !params.shadows.is_neutral() {
                l += ease_in_out(1.0 - l) * params.shadows.as_fraction();
            }
            l = l.clamp(0.0, 1.0);

            if !params.vibrance.is_neutral() {
                s += params.vibrance.as_fraction() * (1.0 - ease_in_out(s));
            }
            if !params.saturation.is_neutral() {
                s *= 1.0 + params.saturation.as_fraction();
            }
            s = s.clamp(0.0, 1.0);

            (r8, g8, b8) = hsl_to_rgb(h, s, l);
        }

        pixel[0] = r8;
        pixel[1] = g8;
        pixel[2] = b8;
        // pixel[3] (alpha) untouched.
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn params(f: impl FnOnce(&mut AdjustmentParams)) -> AdjustmentParams {
        let mut p = AdjustmentParams::default();
        f(&mut p);
        p
    }

    fn checker_buffer() -> Vec<u8> {
        vec![
            10, 200, 30, 255, //
            250, 5, 120, 128, //
            128, 128, 128, 0, //
            0, 255, 255, 255,
        ]
    }

    #[test]
    fn identity_params_return_input_exactly() {
        let input = checker_buffer();
        let output = apply_adjustments(&input, 2, 2, &AdjustmentParams::default()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let err = apply_adjustments(&[0u8; 10], 2, 2, &AdjustmentParams::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = apply_adjustments(&[], 0, 0, &AdjustmentParams::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn alpha_channel_is_never_touched() {
        let input = checker_buffer();
        let p = params(|p| {
            p.exposure = AdjustmentPercent::new(60);
            p.saturation = AdjustmentPercent::new(-40);
        });
        let output = apply_adjustments(&input, 2, 2, &p).unwrap();
        for (pin, pout) in input.chunks_exact(4).zip(output.chunks_exact(4)) {
            assert_eq!(pin[3], pout[3]);
        }
    }

    #[test]
    fn positive_exposure_brightens() {
        let input = vec![100, 100, 100, 255];
        let p = params(|p| p.exposure = AdjustmentPercent::new(100));
        let output = apply_adjustments(&input, 1, 1, &p).unwrap();
        // One full stop doubles each channel.
        assert_eq!(&output[..3], &[200, 200, 200]);
    }

    #[test]
    fn brightness_offsets_and_clamps() {
        let input = vec![250, 10, 128, 255];
        let p = params(|p| p.brightness = AdjustmentPercent::new(20));
        let output = apply_adjustments(&input, 1, 1, &p).unwrap();
        assert_eq!(&output[..3], &[255, 30, 148]);
    }

    #[test]
    fn contrast_pivots_around_mid_gray() {
        let input = vec![128, 28, 228, 255];
        let p = params(|p| p.contrast = AdjustmentPercent::new(50));
        let output = apply_adjustments(&input, 1, 1, &p).unwrap();
        // Mid-gray is the fixed point; others move away from it.
        assert_eq!(output[0], 128);
        assert!(output[1] < 28);
        assert!(output[2] > 228);
    }

    #[test]
    fn full_negative_saturation_produces_gray() {
        let input = vec![200, 40, 90, 255];
        let p = params(|p| p.saturation = AdjustmentPercent::new(-100));
        let output = apply_adjustments(&input, 1, 1, &p).unwrap();
        assert_eq!(output[0], output[1]);
        assert_eq!(output[1], output[2]);
    }

    #[test]
    fn highlights_lift_bright_pixels_more_than_dark_ones() {
        let bright = vec![220, 220, 220, 255];
        let dark = vec![40, 40, 40, 255];
        let p = params(|p| p.highlights = AdjustmentPercent::new(50));

        let bright_out = apply_adjustments(&bright, 1, 1, &p).unwrap();
        let dark_out = apply_adjustments(&dark, 1, 1, &p).unwrap();

        let bright_gain = i32::from(bright_out[0]) - 220;
        let dark_gain = i32::from(dark_out[0]) - 40;
        assert!(bright_gain > dark_gain);
    }

    #[test]
    fn shadows_lift_dark_pixels_more_than_bright_ones() {
        let bright = vec![220, 220, 220, 255];
        let dark = vec![40, 40, 40, 255];
        let p = params(|p| p.shadows = AdjustmentPercent::new(50));

        let bright_out = apply_adjustments(&bright, 1, 1, &p).unwrap();
        let dark_out = apply_adjustments(&dark, 1, 1, &p).unwrap();

        let bright_gain = i32::from(bright_out[0]) - 220;
        let dark_gain = i32::from(dark_out[0]) - 40;
        assert!(dark_gain > bright_gain);
    }

    #[test]
    fn vibrance_boosts_muted_colors_more_than_vivid_ones() {
        let muted = vec![140, 120, 125, 255];
        let vivid = vec![250, 10, 20, 255];
        let p = params(|p| p.vibrance = AdjustmentPercent::new(80));

        let (_, muted_before, _) = rgb_to_hsl(muted[0], muted[1], muted[2]);
        let (_, vivid_before, _) = rgb_to_hsl(vivid[0], vivid[1], vivid[2]);

        let muted_out = apply_adjustments(&muted, 1, 1, &p).unwrap();
        let vivid_out = apply_adjustments(&vivid, 1, 1, &p).unwrap();

        let (_, muted_after, _) = rgb_to_hsl(muted_out[0], muted_out[1], muted_out[2]);
        let (_, vivid_after, _) = rgb_to_hsl(vivid_out[0], vivid_out[1], vivid_out[2]);

        assert!(muted_after - muted_before > vivid_after - vivid_before);
    }

    #[test]
    fn params_reset_and_identity_check() {
        let mut p = params(|p| p.contrast = AdjustmentPercent::new(10));
        assert!(!p.is_identity());
        p.reset();
        assert!(p.is_identity());
    }

    #[test]
    fn params_serde_round_trip() {
        let p = params(|p| {
            p.exposure = AdjustmentPercent::new(-30);
            p.vibrance = AdjustmentPercent::new(70);
        });
        let mut encoded = Vec::new();
        ciborium::into_writer(&p, &mut encoded).unwrap();
        let decoded: AdjustmentParams = ciborium::from_reader(encoded.as_slice()).unwrap();
        assert_eq!(p, decoded);
    }
}

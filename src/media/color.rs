// SPDX-License-Identifier: MPL-2.0
//! Pure color-space conversions and easing used by the adjustment pipeline.
//!
//! Hue, saturation, and lightness are all expressed in `[0, 1]`; hue is the
//! fraction of the full circle. The conversions round-trip within one unit
//! per 8-bit channel.

/// Converts 8-bit RGB channels to hue/saturation/lightness, each in `[0, 1]`.
///
/// Hue is undefined for achromatic input (r == g == b) and reported as 0.
#[must_use]
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic: saturation is zero and hue is meaningless.
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    } / 6.0;

    (h, s, l)
}

/// Converts hue/saturation/lightness in `[0, 1]` back to 8-bit RGB channels.
#[must_use]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    if s == 0.0 {
        // Achromatic shortcut.
        let gray = channel_to_byte(l);
        return (gray, gray, gray);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    let r = hue_to_channel(p, q, h + 1.0 / 3.0);
    let g = hue_to_channel(p, q, h);
    let b = hue_to_channel(p, q, h - 1.0 / 3.0);

    (channel_to_byte(r), channel_to_byte(g), channel_to_byte(b))
}

/// Cubic ease-in-out over `[0, 1]`.
///
/// The pipeline uses this to make highlight/shadow shifts progressively
/// stronger near the extremes of lightness, and vibrance progressively
/// weaker as saturation approaches full.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel_to_byte(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

// SPDX-License-Identifier: MPL-2.0
//! Shared test helpers.
//!
//! Re-exports the `approx` assertion macros used by the color-math and
//! viewport tests, which handle floating-point precision issues that
//! `assert_eq!` cannot.

pub use approx::{assert_abs_diff_eq, assert_abs_diff_ne, assert_relative_eq, assert_relative_ne};

/// Default epsilon for f32 comparisons: tight enough to catch real
/// drift, loose enough to absorb rounding in the HSL conversions.
pub const F32_EPSILON: f32 = 1e-6;

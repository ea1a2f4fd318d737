// SPDX-License-Identifier: MPL-2.0
//! Engine configuration.
//!
//! The engine is embeddable, so there is no configuration file here: hosts
//! construct an [`EngineConfig`] (usually via `Default`) and hand it to the
//! session. All defaults live in the [`defaults`] submodule.

pub mod defaults;

pub use defaults::{
    DEFAULT_VIEW_SCALE, MAX_VIEW_SCALE, MIN_VIEW_SCALE, SESSION_BLOB_KEY, SESSION_SAVE_DEBOUNCE,
    WHEEL_ZOOM_SENSITIVITY,
};

use std::time::Duration;

/// Tunable engine parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Lower bound for the viewport scale.
    pub min_scale: f32,

    /// Upper bound for the viewport scale.
    pub max_scale: f32,

    /// Scale change per unit of wheel delta.
    pub wheel_sensitivity: f32,

    /// Quiet period before a session autosave is written.
    pub save_debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_scale: MIN_VIEW_SCALE,
            max_scale: MAX_VIEW_SCALE,
            wheel_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            save_debounce: SESSION_SAVE_DEBOUNCE,
        }
    }
}

impl EngineConfig {
    /// Returns a copy with the scale bounds reordered if they were supplied
    /// inverted, so later clamping is always well defined.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_named_defaults() {
        let config = EngineConfig::default();
        assert!((config.min_scale - MIN_VIEW_SCALE).abs() < f32::EPSILON);
        assert!((config.max_scale - MAX_VIEW_SCALE).abs() < f32::EPSILON);
        assert_eq!(config.save_debounce, SESSION_SAVE_DEBOUNCE);
    }

    #[test]
    fn normalized_reorders_inverted_bounds() {
        let config = EngineConfig {
            min_scale: 4.0,
            max_scale: 0.5,
            ..EngineConfig::default()
        }
        .normalized();

        assert!(config.min_scale <= config.max_scale);
    }
}

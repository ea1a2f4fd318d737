// SPDX-License-Identifier: MPL-2.0
//! Viewport pan/zoom transform.
//!
//! Maintains the affine transform applied to the displayed image (scale,
//! then translate, in view-space pixels) and converts between view and
//! image coordinates. Pointer input drives a small `{idle, panning}`
//! state machine; wheel input zooms about the pointer so the image point
//! under the cursor stays visually fixed.

use crate::config::EngineConfig;
use crate::domain::editing::Hotspot;
use serde::{Deserialize, Serialize};

/// A position in view-space pixels (the interactive surface).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPoint {
    pub x: f32,
    pub y: f32,
}

impl ViewPoint {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A position in image-space pixels of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePoint {
    pub x: f32,
    pub y: f32,
}

/// The durable part of the viewport: scale plus 2D offset, both in
/// view-space pixels. Applied as "scale, then translate."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: crate::config::defaults::DEFAULT_VIEW_SCALE,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Pointer messages for the pan sub-component.
#[derive(Debug, Clone, Copy)]
pub enum PointerMessage {
    /// Pointer pressed on the interactive surface.
    Down(ViewPoint),
    /// Pointer moved.
    Moved(ViewPoint),
    /// Pointer released.
    Up,
    /// Pointer left the interactive surface.
    Left,
}

/// Effects produced by pointer handling.
#[derive(Debug, Clone, Copy)]
pub enum PanEffect {
    /// Nothing for the caller to do.
    None,
    /// The offset changed; callers re-render and schedule a session save.
    OffsetChanged,
}

#[derive(Debug, Clone, Copy)]
enum PanState {
    Idle,
    Panning { anchor: ViewPoint },
}

/// Zoom/pan state machine over a [`ViewportState`].
#[derive(Debug, Clone)]
pub struct Viewport {
    state: ViewportState,
    pan: PanState,
    min_scale: f32,
    max_scale: f32,
    wheel_sensitivity: f32,
}

impl Viewport {
    /// Creates a viewport at the default transform with the config's
    /// scale bounds and wheel sensitivity. The bounds are normalized
    /// first so clamping stays well defined even for a config built with
    /// inverted bounds.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let config = config.normalized();
        Self {
            state: ViewportState::default(),
            pan: PanState::Idle,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            wheel_sensitivity: config.wheel_sensitivity,
        }
    }

    /// The current transform.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Current scale factor.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    /// Current offset in view-space pixels.
    #[must_use]
    pub fn offset(&self) -> (f32, f32) {
        (self.state.offset_x, self.state.offset_y)
    }

    /// Whether a pan gesture is in progress.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning { .. })
    }

    /// Replaces the transform wholesale (session restore), clamping the
    /// scale into bounds and ending any in-flight pan.
    pub fn restore(&mut self, state: ViewportState) {
        self.state = ViewportState {
            scale: self.clamp_scale(state.scale),
            offset_x: state.offset_x,
            offset_y: state.offset_y,
        };
        self.pan = PanState::Idle;
    }

    /// Resets the transform to the default (new image loaded).
    pub fn reset(&mut self) {
        self.state = ViewportState::default();
        self.pan = PanState::Idle;
    }

    /// Handles a pointer message, advancing the pan state machine.
    pub fn handle(&mut self, msg: PointerMessage) -> PanEffect {
        match msg {
            PointerMessage::Down(position) => {
                self.pan = PanState::Panning { anchor: position };
                PanEffect::None
            }
            PointerMessage::Moved(position) => match self.pan {
                PanState::Panning { anchor } => {
                    self.state.offset_x += position.x - anchor.x;
                    self.state.offset_y += position.y - anchor.y;
                    self.pan = PanState::Panning { anchor: position };
                    PanEffect::OffsetChanged
                }
                PanState::Idle => PanEffect::None,
            },
            PointerMessage::Up | PointerMessage::Left => {
                self.pan = PanState::Idle;
                PanEffect::None
            }
        }
    }

    /// Applies a wheel/scroll delta, zooming about `pointer` so the image
    /// point under the cursor stays fixed. Returns whether the scale
    /// actually changed (it will not at the clamp boundaries).
    pub fn wheel_zoom(&mut self, delta: f32, pointer: ViewPoint) -> bool {
        let candidate = self.state.scale + delta * self.wheel_sensitivity;
        self.zoom_about(candidate, pointer)
    }

    /// Sets the scale to `new_scale` (clamped into bounds), adjusting the
    /// offset so the image point under `pointer` keeps its view position:
    /// `new_offset = pointer - (pointer - old_offset) * (new / old)`.
    pub fn zoom_about(&mut self, new_scale: f32, pointer: ViewPoint) -> bool {
        let new_scale = self.clamp_scale(new_scale);
        let old_scale = self.state.scale;
        if (new_scale - old_scale).abs() < f32::EPSILON {
            return false;
        }

        let ratio = new_scale / old_scale;
        self.state.offset_x = pointer.x - (pointer.x - self.state.offset_x) * ratio;
        self.state.offset_y = pointer.y - (pointer.y - self.state.offset_y) * ratio;
        self.state.scale = new_scale;
        true
    }

    /// Maps a view-space point into image space:
    /// `image = (view - offset) / scale`. Returns `None` when the point
    /// falls outside the displayed image's `[0, width] x [0, height]`
    /// bounds.
    #[must_use]
    pub fn view_to_image(
        &self,
        point: ViewPoint,
        displayed_width: u32,
        displayed_height: u32,
    ) -> Option<ImagePoint> {
        let x = (point.x - self.state.offset_x) / self.state.scale;
        let y = (point.y - self.state.offset_y) / self.state.scale;
        let in_bounds = x >= 0.0
            && y >= 0.0
            && x <= displayed_width as f32
            && y <= displayed_height as f32;
        in_bounds.then_some(ImagePoint { x, y })
    }

    /// Maps a view-space click to a full-resolution hotspot. The
    /// image-space point is rescaled by the ratio of the native
    /// resolution to the displayed resolution, since remote edits operate
    /// on the full-resolution source.
    #[must_use]
    pub fn click_to_hotspot(
        &self,
        point: ViewPoint,
        displayed: (u32, u32),
        native: (u32, u32),
    ) -> Option<Hotspot> {
        if displayed.0 == 0 || displayed.1 == 0 {
            return None;
        }
        let image = self.view_to_image(point, displayed.0, displayed.1)?;
        let scale_x = native.0 as f32 / displayed.0 as f32;
        let scale_y = native.1 as f32 / displayed.1 as f32;
        let x = (image.x * scale_x).round().clamp(0.0, native.0 as f32);
        let y = (image.y * scale_y).round().clamp(0.0, native.1 as f32);
        Some(Hotspot {
            x: x as u32,
            y: y as u32,
        })
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

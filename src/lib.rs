// SPDX-License-Identifier: MPL-2.0
//! `darkroom_core` is the non-destructive edit-state engine for an
//! interactive image editor.
//!
//! It provides a versioned snapshot history with managed display-handle
//! lifecycles, a concurrent slider-adjustment pipeline with stale-result
//! rejection, a pan/zoom viewport transform, and a debounced session
//! snapshot codec. The remote generative-edit service and the persistent
//! blob store are ports; presentational UI lives outside the crate.

#![doc(html_root_url = "https://docs.rs/darkroom_core/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod session;

#[cfg(test)]
pub mod test_utils;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use session::EditSession;

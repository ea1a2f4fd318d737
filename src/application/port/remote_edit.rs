// SPDX-License-Identifier: MPL-2.0
//! Remote generative-edit port definition.
//!
//! This module defines the [`RemoteEditor`] trait for AI-backed image
//! edits. The engine treats the collaborator as an opaque async function
//! from (image, instruction, optional hotspot) to a new image or a
//! descriptive failure.
//!
//! # Design Notes
//!
//! - Failures are non-retryable from the engine's point of view and are
//!   surfaced to the caller verbatim
//! - There is no built-in timeout; a newer request does not cancel a
//!   pending one, it merely claims the latest-sequence slot so the pending
//!   result is ignored when it arrives

use crate::domain::editing::Hotspot;
use std::fmt;

// =============================================================================
// RemoteEditError
// =============================================================================

/// Errors reported by the remote edit collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEditError {
    /// The request was rejected by a safety system.
    SafetyBlocked(String),

    /// The collaborator answered but returned no editable image part
    /// (incomplete generation, text-only answer, and similar causes).
    NoImageReturned(String),

    /// The collaborator could not be reached or the call failed in
    /// transit.
    Transport(String),
}

impl fmt::Display for RemoteEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteEditError::SafetyBlocked(msg) => write!(f, "request blocked: {msg}"),
            RemoteEditError::NoImageReturned(msg) => {
                write!(f, "no image returned: {msg}")
            }
            RemoteEditError::Transport(msg) => write!(f, "transport failure: {msg}"),
        }
    }
}

impl std::error::Error for RemoteEditError {}

// =============================================================================
// RemoteEditor Trait
// =============================================================================

/// Port for the remote generative-edit collaborator.
///
/// Implementations wrap whatever service performs the actual edit. The
/// engine never retries a failed call and keeps its history untouched on
/// failure.
///
/// # Example
///
/// ```ignore
/// use darkroom_core::application::port::remote_edit::{RemoteEditError, RemoteEditor};
/// use darkroom_core::domain::editing::Hotspot;
///
/// struct Passthrough;
///
/// impl RemoteEditor for Passthrough {
///     async fn edit_image(
///         &self,
///         source: &[u8],
///         _instruction: &str,
///         _hotspot: Option<Hotspot>,
///     ) -> Result<Vec<u8>, RemoteEditError> {
///         Ok(source.to_vec())
///     }
/// }
/// ```
pub trait RemoteEditor {
    /// Produces an edited image from the full-resolution source bytes.
    ///
    /// `hotspot`, when present, marks where the instruction should apply,
    /// in native image pixels.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteEditError`] describing why no edited image is
    /// available. The engine surfaces the message verbatim.
    fn edit_image(
        &self,
        source: &[u8],
        instruction: &str,
        hotspot: Option<Hotspot>,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, RemoteEditError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_descriptive() {
        let err = RemoteEditError::SafetyBlocked("policy violation".to_string());
        assert_eq!(err.to_string(), "request blocked: policy violation");

        let err = RemoteEditError::NoImageReturned("text-only answer".to_string());
        assert_eq!(err.to_string(), "no image returned: text-only answer");
    }
}

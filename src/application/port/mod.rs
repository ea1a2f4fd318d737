// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters
//! implement. These traits use only domain types, ensuring the engine
//! remains independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`remote_edit`]: the generative edit collaborator
//! - [`blob_store`]: opaque key/value persistence for session snapshots
//!
//! # Design Notes
//!
//! - All traits use domain types only (no framework handles)
//! - Traits use native `async fn`; call sites stay generic, so no trait
//!   objects or boxing are needed
//! - Methods return `Result` with port-specific error types

pub mod blob_store;
pub mod remote_edit;

// Re-export main types for convenience
pub use blob_store::{BlobStore, InMemoryBlobStore, StoreError};
pub use remote_edit::{RemoteEditError, RemoteEditor};

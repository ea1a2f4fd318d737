// SPDX-License-Identifier: MPL-2.0
//! Domain layer: pure data types with no presentation or infrastructure
//! dependencies.

pub mod editing;
pub mod media;

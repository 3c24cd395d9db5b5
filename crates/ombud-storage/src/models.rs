// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `ombud-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use ombud_core::types::{ClientId, ContentItem, ContentKind, Request, RequestChanges, RequestId};

// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules over the [`crate::database::Database`] handle.

pub mod items;
pub mod requests;

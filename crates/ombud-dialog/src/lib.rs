// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request lifecycle manager and notification fan-out.
//!
//! [`Lifecycle`] owns the per-chat conversation state and drives every
//! transition from branch selection through dispatch and the staff
//! reply cycle; [`Fanout`] decides which staff targets receive a
//! finalized request and renders the payload per shape (text-only,
//! media-only, mixed).

pub mod fanout;
pub mod lifecycle;
pub mod routing;
pub mod session;

pub use fanout::Fanout;
pub use lifecycle::Lifecycle;
pub use routing::{Destination, Destinations};
pub use session::{SessionMap, Stage};

// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits implemented by the adapter crates.

pub mod mailer;
pub mod messenger;
pub mod store;

pub use mailer::Mailer;
pub use messenger::Messenger;
pub use store::RequestStore;

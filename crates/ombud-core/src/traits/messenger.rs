// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound chat transport contract.

use async_trait::async_trait;

use crate::error::OmbudError;
use crate::types::{Button, MediaRef};

/// Outbound side of the chat transport.
///
/// Each call is one independent best-effort delivery; callers decide
/// whether a [`OmbudError::Delivery`] failure aborts anything else.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a text message, optionally with an inline button row.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        buttons: Option<Vec<Button>>,
    ) -> Result<(), OmbudError>;

    /// Send a group of media references, preserving their order.
    async fn send_media_group(&self, chat_id: i64, items: &[MediaRef]) -> Result<(), OmbudError>;
}

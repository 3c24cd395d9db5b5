// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-chat conversation position.
//!
//! Dialogue position is transient: it lives in process memory, keyed by
//! chat identity, and is distinct from the durable request record. It
//! is not persisted across restarts.

use std::collections::HashMap;

use ombud_core::types::{ClientId, RequestId};
use tokio::sync::Mutex;

/// Where one chat currently stands in the conversation script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Stage {
    /// No submission or reply cycle in progress.
    #[default]
    Idle,
    /// Client was shown the destination keyboard.
    ChoosingBranch,
    /// Client is sending content items for the draft request.
    CollectingContent {
        request_id: RequestId,
        branch: String,
    },
    /// Client was shown the review prompt; more content is still accepted.
    Reviewing {
        request_id: RequestId,
        branch: String,
    },
    /// Staff member pressed Reply and owes us the reply text.
    AwaitingReplyText {
        client_id: ClientId,
        request_id: RequestId,
    },
    /// Staff member saw the reply preview and can send or edit it.
    PreviewingReply {
        client_id: ClientId,
        request_id: RequestId,
    },
}

impl Stage {
    /// The draft request bound to this stage, if the chat is composing one.
    pub fn draft_request(&self) -> Option<RequestId> {
        match self {
            Stage::CollectingContent { request_id, .. } | Stage::Reviewing { request_id, .. } => {
                Some(*request_id)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::ChoosingBranch => "choosing_branch",
            Stage::CollectingContent { .. } => "collecting_content",
            Stage::Reviewing { .. } => "reviewing",
            Stage::AwaitingReplyText { .. } => "awaiting_reply_text",
            Stage::PreviewingReply { .. } => "previewing_reply",
        };
        write!(f, "{name}")
    }
}

/// In-memory stage table keyed by chat identity.
///
/// One conversation advances one event at a time; the mutex serializes
/// lookups against updates from other chats.
#[derive(Default)]
pub struct SessionMap {
    inner: Mutex<HashMap<i64, Stage>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage for a chat; [`Stage::Idle`] if never seen.
    pub async fn get(&self, chat: ClientId) -> Stage {
        self.inner
            .lock()
            .await
            .get(&chat.0)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set(&self, chat: ClientId, stage: Stage) {
        self.inner.lock().await.insert(chat.0, stage);
    }

    /// Drop the chat back to [`Stage::Idle`].
    pub async fn reset(&self, chat: ClientId) {
        self.inner.lock().await.remove(&chat.0);
    }
}

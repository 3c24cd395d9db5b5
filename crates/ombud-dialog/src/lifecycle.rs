// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The request lifecycle manager.
//!
//! Drives a client's submission through destination choice, content
//! collection, review, dispatch, and the staff reply cycle. Rejected
//! input and stale button presses are answered with a plain-language
//! message and never advance the state machine; storage errors abort
//! the transition and propagate to the transport layer, which surfaces
//! a generic apology. No transition is retried automatically.

use std::sync::Arc;

use ombud_core::traits::{Mailer, Messenger, RequestStore};
use ombud_core::types::{Button, ClientId, ContentKind, Request, RequestChanges, RequestId};
use ombud_core::{Action, OmbudError};
use tracing::{debug, info, warn};

use crate::fanout::Fanout;
use crate::routing::Destinations;
use crate::session::{SessionMap, Stage};

/// State machine governing every conversation, client and staff side.
pub struct Lifecycle {
    store: Arc<dyn RequestStore>,
    messenger: Arc<dyn Messenger>,
    routes: Arc<Destinations>,
    fanout: Fanout,
    sessions: SessionMap,
}

impl Lifecycle {
    pub fn new(
        store: Arc<dyn RequestStore>,
        messenger: Arc<dyn Messenger>,
        mailer: Arc<dyn Mailer>,
        routes: Arc<Destinations>,
    ) -> Self {
        let fanout = Fanout::new(messenger.clone(), mailer, routes.clone());
        Self {
            store,
            messenger,
            routes,
            fanout,
            sessions: SessionMap::new(),
        }
    }

    /// Current stage for a chat (exposed for the transport layer and tests).
    pub async fn stage(&self, chat: ClientId) -> Stage {
        self.sessions.get(chat).await
    }

    /// Whether a chat id belongs to the staff allow-list.
    pub fn is_staff_chat(&self, chat_id: i64) -> bool {
        self.routes.is_staff_chat(chat_id)
    }

    // --- Client side ---

    /// `/start`: greet and show the main menu. Mutates nothing durable.
    pub async fn start(&self, client: ClientId) -> Result<(), OmbudError> {
        self.sessions.reset(client).await;
        self.messenger
            .send_text(
                client.0,
                "Good afternoon! How can I help you? Choose one of the options:",
                Some(vec![
                    Button::new("Submit a request", Action::NewRequest.encode()),
                    Button::new("About this bot", Action::About.encode()),
                ]),
            )
            .await
    }

    /// Informational blurb from the main menu.
    pub async fn about(&self, client: ClientId) -> Result<(), OmbudError> {
        self.messenger
            .send_text(
                client.0,
                "I am a virtual assistant that routes your requests to our \
                 branches or the head office. How can I help you today?",
                Some(vec![Button::new(
                    "Submit a request",
                    Action::NewRequest.encode(),
                )]),
            )
            .await
    }

    /// Open a new submission: show the destination keyboard.
    pub async fn begin_request(&self, client: ClientId) -> Result<(), OmbudError> {
        let buttons = self
            .routes
            .names()
            .into_iter()
            .map(|name| {
                Button::new(
                    name,
                    Action::ChooseBranch {
                        branch: name.to_string(),
                    }
                    .encode(),
                )
            })
            .collect();
        self.messenger
            .send_text(
                client.0,
                "Please choose where to direct your request:",
                Some(buttons),
            )
            .await?;
        self.sessions.set(client, Stage::ChoosingBranch).await;
        Ok(())
    }

    /// Destination chosen: create the request and start collecting content.
    pub async fn choose_branch(&self, client: ClientId, branch: &str) -> Result<(), OmbudError> {
        if !self.routes.contains(branch) {
            debug!(client = client.0, branch, "unknown destination rejected");
            return self
                .messenger
                .send_text(
                    client.0,
                    "That destination is not available. Please choose one of the listed options.",
                    None,
                )
                .await;
        }

        let request_id = self.store.create_request(client, Some(branch)).await?;
        info!(client = client.0, request_id = request_id.0, branch, "request opened");

        let notice = if self.routes.is_head_office(branch) {
            "Your request will be sent to the head office. \
             You can send text, photos, videos, or voice messages."
                .to_string()
        } else {
            format!(
                "Your request will be sent to {branch} and copied to the head office. \
                 You can send text, photos, videos, or voice messages."
            )
        };
        self.messenger.send_text(client.0, &notice, None).await?;
        self.sessions
            .set(
                client,
                Stage::CollectingContent {
                    request_id,
                    branch: branch.to_string(),
                },
            )
            .await;
        Ok(())
    }

    /// One content message from the client.
    ///
    /// Valid only while a draft is in progress; anything arriving after
    /// the draft was dispatched (or before one exists) appends nothing,
    /// changes no state, and earns a notice.
    pub async fn receive_content(
        &self,
        client: ClientId,
        kind: ContentKind,
        payload: &str,
    ) -> Result<(), OmbudError> {
        let stage = self.sessions.get(client).await;
        let (request_id, branch) = match stage {
            Stage::CollectingContent { request_id, branch }
            | Stage::Reviewing { request_id, branch } => (request_id, branch),
            _ => {
                debug!(client = client.0, %stage, "content outside collection refused");
                return self
                    .messenger
                    .send_text(
                        client.0,
                        "There is no request in progress. Use /start to begin a new one.",
                        None,
                    )
                    .await;
            }
        };

        self.store.append_item(request_id, kind, payload).await?;
        debug!(
            client = client.0,
            request_id = request_id.0,
            kind = %kind,
            "content item appended"
        );

        let Some(request) = self.store.get_request(request_id).await? else {
            warn!(request_id = request_id.0, "draft request vanished");
            self.sessions.reset(client).await;
            return self
                .messenger
                .send_text(
                    client.0,
                    "Your draft could not be found. Use /start to begin a new one.",
                    None,
                )
                .await;
        };

        let summary = review_summary(&request, &branch);
        self.messenger
            .send_text(
                client.0,
                &summary,
                Some(vec![
                    Button::new(
                        "Send",
                        Action::ConfirmSend { request_id }.encode(),
                    ),
                    Button::new(
                        "Edit",
                        Action::EditMessage { request_id }.encode(),
                    ),
                    Button::new("Add more", Action::AddMore { request_id }.encode()),
                ]),
            )
            .await?;
        self.sessions
            .set(client, Stage::Reviewing { request_id, branch })
            .await;
        Ok(())
    }

    /// Client confirmed the draft: freeze it and fan out to staff.
    ///
    /// Guarded by the stage binding, so a stale or repeated confirm
    /// press cannot dispatch twice.
    pub async fn confirm(&self, client: ClientId, request_id: RequestId) -> Result<(), OmbudError> {
        let stage = self.sessions.get(client).await;
        if stage.draft_request() != Some(request_id) {
            debug!(client = client.0, request_id = request_id.0, %stage, "stale confirm refused");
            return self
                .messenger
                .send_text(
                    client.0,
                    "This draft is no longer active. Use /start to begin a new request.",
                    None,
                )
                .await;
        }

        let Some(request) = self.store.get_request(request_id).await? else {
            self.sessions.reset(client).await;
            return self
                .messenger
                .send_text(
                    client.0,
                    "Your draft could not be found. Use /start to begin a new one.",
                    None,
                )
                .await;
        };

        // Freeze first: once the binding is dropped, no further content
        // or confirm press can touch this request.
        self.sessions.reset(client).await;

        if let Err(e) = self
            .messenger
            .send_text(
                client.0,
                "Thank you for your request! We will get back to you shortly.",
                None,
            )
            .await
        {
            warn!(client = client.0, error = %e, "confirmation notice failed");
        }

        self.fanout.dispatch(&request).await;
        Ok(())
    }

    /// Client discards the draft items and starts composing again.
    pub async fn edit_draft(
        &self,
        client: ClientId,
        request_id: RequestId,
    ) -> Result<(), OmbudError> {
        let stage = self.sessions.get(client).await;
        let Some(branch) = (match &stage {
            Stage::CollectingContent { request_id: id, branch }
            | Stage::Reviewing { request_id: id, branch }
                if *id == request_id =>
            {
                Some(branch.clone())
            }
            _ => None,
        }) else {
            return self.stale_draft_notice(client).await;
        };

        self.store.clear_items(request_id).await?;
        self.sessions
            .set(client, Stage::CollectingContent { request_id, branch })
            .await;
        self.messenger
            .send_text(client.0, "Enter the new content for your request.", None)
            .await
    }

    /// Client keeps the draft items and appends more.
    pub async fn add_more(
        &self,
        client: ClientId,
        request_id: RequestId,
    ) -> Result<(), OmbudError> {
        let stage = self.sessions.get(client).await;
        let Some(branch) = (match &stage {
            Stage::CollectingContent { request_id: id, branch }
            | Stage::Reviewing { request_id: id, branch }
                if *id == request_id =>
            {
                Some(branch.clone())
            }
            _ => None,
        }) else {
            return self.stale_draft_notice(client).await;
        };

        self.sessions
            .set(client, Stage::CollectingContent { request_id, branch })
            .await;
        self.messenger
            .send_text(client.0, "Send the next item for your request.", None)
            .await
    }

    async fn stale_draft_notice(&self, client: ClientId) -> Result<(), OmbudError> {
        self.messenger
            .send_text(
                client.0,
                "This draft is no longer active. Use /start to begin a new request.",
                None,
            )
            .await
    }

    // --- Staff side ---

    /// Staff pressed Reply on a dispatched request.
    pub async fn begin_reply(
        &self,
        staff: ClientId,
        client_id: ClientId,
        request_id: RequestId,
    ) -> Result<(), OmbudError> {
        self.sessions
            .set(
                staff,
                Stage::AwaitingReplyText {
                    client_id,
                    request_id,
                },
            )
            .await;
        self.messenger
            .send_text(staff.0, "Enter your reply for the client:", None)
            .await
    }

    /// Staff typed the reply text: record it and show the preview.
    pub async fn record_reply_text(&self, staff: ClientId, text: &str) -> Result<(), OmbudError> {
        let stage = self.sessions.get(staff).await;
        let Stage::AwaitingReplyText {
            client_id,
            request_id,
        } = stage
        else {
            return self
                .messenger
                .send_text(
                    staff.0,
                    "Could not determine which request this reply belongs to. \
                     Use the Reply button on a request notification.",
                    None,
                )
                .await;
        };

        match self
            .store
            .update_request(
                request_id,
                RequestChanges {
                    admin_response: Some(text.to_string()),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(()) => {}
            Err(OmbudError::NotFound(_)) => {
                self.sessions.reset(staff).await;
                return self
                    .messenger
                    .send_text(staff.0, "That request no longer exists.", None)
                    .await;
            }
            Err(e) => return Err(e),
        }

        self.sessions
            .set(
                staff,
                Stage::PreviewingReply {
                    client_id,
                    request_id,
                },
            )
            .await;
        self.messenger
            .send_text(
                staff.0,
                &format!("Reply preview:\n{text}"),
                Some(vec![
                    Button::new(
                        "Send",
                        Action::SendToClient {
                            client_id,
                            request_id,
                        }
                        .encode(),
                    ),
                    Button::new(
                        "Edit",
                        Action::EditResponse {
                            client_id,
                            request_id,
                        }
                        .encode(),
                    ),
                ]),
            )
            .await
    }

    /// Staff confirmed the preview: deliver the stored reply and close.
    ///
    /// The reply text must already be recorded; a confirm press with no
    /// stored reply is a detectable misuse and sends nothing to the client.
    pub async fn send_reply(
        &self,
        staff: ClientId,
        client_id: ClientId,
        request_id: RequestId,
    ) -> Result<(), OmbudError> {
        let Some(request) = self.store.get_request(request_id).await? else {
            return self
                .messenger
                .send_text(staff.0, "That request no longer exists.", None)
                .await;
        };
        let Some(reply) = request.admin_response.clone() else {
            warn!(
                staff = staff.0,
                request_id = request_id.0,
                "reply confirm with no stored reply"
            );
            return self
                .messenger
                .send_text(
                    staff.0,
                    "No reply has been recorded for this request yet. \
                     Use the Reply button first.",
                    None,
                )
                .await;
        };

        if let Err(e) = self
            .messenger
            .send_text(client_id.0, &format!("Reply from support: {reply}"), None)
            .await
        {
            warn!(client = client_id.0, error = %e, "reply delivery failed");
            return self
                .messenger
                .send_text(
                    staff.0,
                    "Delivery to the client failed. You can press Send to try again.",
                    None,
                )
                .await;
        }

        info!(
            staff = staff.0,
            client = client_id.0,
            request_id = request_id.0,
            "reply delivered, request closed"
        );
        self.sessions.reset(staff).await;
        self.messenger
            .send_text(staff.0, "Your reply has been sent to the client.", None)
            .await?;
        self.fanout.mirror_reply(&request, client_id, &reply).await;
        Ok(())
    }

    /// Staff wants to rewrite the reply before sending.
    pub async fn edit_reply(
        &self,
        staff: ClientId,
        client_id: ClientId,
        request_id: RequestId,
    ) -> Result<(), OmbudError> {
        self.sessions
            .set(
                staff,
                Stage::AwaitingReplyText {
                    client_id,
                    request_id,
                },
            )
            .await;
        self.messenger
            .send_text(staff.0, "Edit your reply and send it again.", None)
            .await
    }
}

/// Summarize the accumulated draft for the client's review prompt.
fn review_summary(request: &Request, branch: &str) -> String {
    let mut summary = format!("Review your request to {branch}:");
    for item in &request.items {
        match item.kind {
            ContentKind::Text => {
                summary.push_str(&format!("\n- {}", item.content));
            }
            kind => {
                summary.push_str(&format!("\n- [{kind}]"));
            }
        }
    }
    summary.push_str("\n\nReady to send, or would you like to change it?");
    summary
}

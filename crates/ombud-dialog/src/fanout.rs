// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification fan-out: who receives a finalized request, and how it
//! is rendered.
//!
//! Every outbound call here is an independent best-effort delivery.
//! A failed email never blocks the chat copy, and no failure rolls the
//! dispatch back.

use std::sync::Arc;

use ombud_core::traits::{Mailer, Messenger};
use ombud_core::types::{Button, ClientId, ContentKind, MediaRef, Request};
use ombud_core::Action;
use tracing::{info, warn};

use crate::routing::Destinations;

/// Delivers finalized requests and staff replies to their targets.
pub struct Fanout {
    messenger: Arc<dyn Messenger>,
    mailer: Arc<dyn Mailer>,
    routes: Arc<Destinations>,
}

impl Fanout {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        mailer: Arc<dyn Mailer>,
        routes: Arc<Destinations>,
    ) -> Self {
        Self {
            messenger,
            mailer,
            routes,
        }
    }

    /// Deliver a confirmed request to its branch channel and the
    /// head-office channel (deduplicated), mirroring by email.
    pub async fn dispatch(&self, request: &Request) {
        let (primary, copy) = self.routes.targets_for(request.branch.as_deref());
        let destination_name = request
            .branch
            .clone()
            .unwrap_or_else(|| self.routes.head_office().name.clone());

        let body = chat_body(request, &destination_name);
        let media = media_refs(request);

        // The primary target gets the reply button; the head-office
        // duplicate is informational only.
        let reply_button = Button::new(
            "Reply",
            Action::ReplyToClient {
                client_id: request.client_id,
                request_id: request.request_id,
            }
            .encode(),
        );

        self.send_chat(primary.chat_id, &body, Some(vec![reply_button]), &media)
            .await;
        if let Some(copy) = copy {
            self.send_chat(copy.chat_id, &body, None, &media).await;
        }

        let email_body = email_body(request, &destination_name);
        let subject = format!("New request #{}", request.request_id);
        let mut mailed = Vec::new();
        for destination in [Some(primary), copy].into_iter().flatten() {
            if let Some(ref address) = destination.email
                && !mailed.contains(address)
            {
                self.send_mail(&subject, &email_body, address).await;
                mailed.push(address.clone());
            }
        }

        info!(
            request_id = request.request_id.0,
            branch = %destination_name,
            items = request.items.len(),
            "request dispatched"
        );
    }

    /// Mirror a delivered staff reply to the head-office channel and mailbox.
    pub async fn mirror_reply(&self, request: &Request, client_id: ClientId, reply: &str) {
        let branch_name = request
            .branch
            .clone()
            .unwrap_or_else(|| self.routes.head_office().name.clone());
        let body = format!(
            "Reply from {branch_name} delivered to client {client_id}.\n\
             Request #{}\n\
             Reply: {reply}",
            request.request_id
        );

        let head_office = self.routes.head_office();
        self.send_chat(head_office.chat_id, &body, None, &[]).await;
        if let Some(ref address) = head_office.email {
            let subject = format!("Reply sent for request #{}", request.request_id);
            self.send_mail(&subject, &body, address).await;
        }
    }

    /// One chat target: text first, then the ordered media roster.
    async fn send_chat(
        &self,
        chat_id: i64,
        body: &str,
        buttons: Option<Vec<Button>>,
        media: &[MediaRef],
    ) {
        if let Err(e) = self.messenger.send_text(chat_id, body, buttons).await {
            warn!(chat_id, error = %e, "chat notification failed");
        }
        if !media.is_empty()
            && let Err(e) = self.messenger.send_media_group(chat_id, media).await
        {
            warn!(chat_id, error = %e, "media delivery failed");
        }
    }

    async fn send_mail(&self, subject: &str, body: &str, to: &str) {
        if let Err(e) = self.mailer.send(subject, body, to, None).await {
            warn!(to, error = %e, "email mirror failed");
        }
    }
}

/// Ordered media references for a request (photos, videos, voice notes).
pub(crate) fn media_refs(request: &Request) -> Vec<MediaRef> {
    request
        .items
        .iter()
        .filter(|item| item.kind.is_media())
        .map(|item| MediaRef {
            kind: item.kind,
            file_id: item.content.clone(),
        })
        .collect()
}

/// Concatenated free-text block, `None` when the request carries no text.
fn text_block(request: &Request) -> Option<String> {
    let texts: Vec<&str> = request
        .items
        .iter()
        .filter(|item| item.kind == ContentKind::Text)
        .map(|item| item.content.as_str())
        .collect();
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

/// Render the chat notification: header, then the text block if any.
///
/// Media travels separately as a media group, so a media-only request
/// produces no empty text section here.
pub(crate) fn chat_body(request: &Request, destination_name: &str) -> String {
    let mut body = format!(
        "New request #{} from client {}\nDestination: {destination_name}",
        request.request_id, request.client_id
    );
    if let Some(texts) = text_block(request) {
        body.push_str("\n\n");
        body.push_str(&texts);
    }
    body
}

/// Render the email mirror: the chat body plus a roster of media references.
pub(crate) fn email_body(request: &Request, destination_name: &str) -> String {
    let mut body = chat_body(request, destination_name);
    let media = media_refs(request);
    if !media.is_empty() {
        body.push_str("\n\nAttachments:");
        for item in &media {
            body.push_str(&format!("\n- {} {}", item.kind, item.file_id));
        }
    }
    body
}

// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram transport adapter for the Ombud intake bot.
//!
//! Long-polls the Bot API, classifies inbound updates, parses button
//! payloads into typed actions at this boundary, and routes everything
//! into the [`Lifecycle`] manager. Outbound delivery lives in
//! [`outbound::TelegramMessenger`].

pub mod handler;
pub mod outbound;

use std::sync::Arc;

use ombud_core::{Action, ClientId, OmbudError};
use ombud_dialog::Lifecycle;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

pub use outbound::TelegramMessenger;

/// Build a Bot API client from a non-empty token.
pub fn bot_from_token(token: &str) -> Result<Bot, OmbudError> {
    if token.is_empty() {
        return Err(OmbudError::Config("bot.token cannot be empty".into()));
    }
    Ok(Bot::new(token))
}

/// Long-polling gateway wiring Telegram updates into the lifecycle manager.
pub struct TelegramGateway {
    bot: Bot,
    lifecycle: Arc<Lifecycle>,
}

impl TelegramGateway {
    /// Creates a new gateway. Requires a non-empty bot token.
    pub fn new(token: &str, lifecycle: Arc<Lifecycle>) -> Result<Self, OmbudError> {
        Ok(Self::with_bot(bot_from_token(token)?, lifecycle))
    }

    /// Creates a gateway over an existing Bot client, so the outbound
    /// [`TelegramMessenger`] can share it.
    pub fn with_bot(bot: Bot, lifecycle: Arc<Lifecycle>) -> Self {
        Self { bot, lifecycle }
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Run long polling until shutdown.
    pub async fn run(self) {
        info!("starting Telegram long polling");

        let lifecycle_msg = self.lifecycle.clone();
        let lifecycle_cb = self.lifecycle.clone();

        let message_branch = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let lifecycle = lifecycle_msg.clone();
            async move {
                dispatch_message(&bot, &lifecycle, &msg).await;
                respond(())
            }
        });
        let callback_branch =
            Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let lifecycle = lifecycle_cb.clone();
                async move {
                    dispatch_callback(&bot, &lifecycle, &q).await;
                    respond(())
                }
            });

        let tree = teloxide::dptree::entry()
            .branch(message_branch)
            .branch(callback_branch);

        Dispatcher::builder(self.bot, tree)
            .default_handler(|_| async {}) // Silently ignore other update types
            .build()
            .dispatch()
            .await;
    }
}

/// Route one inbound message into the lifecycle manager.
async fn dispatch_message(bot: &Bot, lifecycle: &Lifecycle, msg: &Message) {
    let chat = ClientId(msg.chat.id.0);

    let result = if handler::is_start_command(msg) {
        lifecycle.start(chat).await
    } else if lifecycle.is_staff_chat(chat.0) {
        // Staff chats only ever type reply text; everything else there
        // is chatter we leave alone.
        match msg.text() {
            Some(text) => lifecycle.record_reply_text(chat, text).await,
            None => Ok(()),
        }
    } else {
        match handler::extract_content(msg) {
            Some((kind, payload)) => lifecycle.receive_content(chat, kind, &payload).await,
            None => {
                debug!(chat_id = chat.0, "unsupported message type refused");
                notify(
                    bot,
                    chat.0,
                    "That message type is not supported. \
                     Please send text, a photo, a video, or a voice message.",
                )
                .await;
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        error!(chat_id = chat.0, error = %e, "message handling failed");
        apologize(bot, chat.0).await;
    }
}

/// Route one button press into the lifecycle manager.
async fn dispatch_callback(bot: &Bot, lifecycle: &Lifecycle, q: &CallbackQuery) {
    // Stop the button's loading animation regardless of outcome.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        debug!(error = %e, "answer_callback_query failed");
    }

    // Conversation state is keyed by the chat the button lives in; for
    // direct messages this equals the user id.
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id.0)
        .unwrap_or(q.from.id.0 as i64);
    let chat = ClientId(chat_id);

    let Some(ref payload) = q.data else {
        return;
    };
    let action = match Action::parse(payload) {
        Ok(action) => action,
        Err(e) => {
            warn!(chat_id, payload = %payload, error = %e, "malformed button payload");
            notify(bot, chat_id, "That button is no longer valid.").await;
            return;
        }
    };

    let result = match action {
        Action::NewRequest => lifecycle.begin_request(chat).await,
        Action::About => lifecycle.about(chat).await,
        Action::ChooseBranch { branch } => lifecycle.choose_branch(chat, &branch).await,
        Action::ConfirmSend { request_id } => lifecycle.confirm(chat, request_id).await,
        Action::EditMessage { request_id } => lifecycle.edit_draft(chat, request_id).await,
        Action::AddMore { request_id } => lifecycle.add_more(chat, request_id).await,
        Action::ReplyToClient {
            client_id,
            request_id,
        } => lifecycle.begin_reply(chat, client_id, request_id).await,
        Action::SendToClient {
            client_id,
            request_id,
        } => lifecycle.send_reply(chat, client_id, request_id).await,
        Action::EditResponse {
            client_id,
            request_id,
        } => lifecycle.edit_reply(chat, client_id, request_id).await,
    };

    if let Err(e) = result {
        error!(chat_id, error = %e, "callback handling failed");
        apologize(bot, chat_id).await;
    }
}

/// Best-effort informational message; failures only logged.
async fn notify(bot: &Bot, chat_id: i64, text: &str) {
    if let Err(e) = bot
        .send_message(teloxide::types::ChatId(chat_id), text)
        .await
    {
        warn!(chat_id, error = %e, "notice delivery failed");
    }
}

/// Generic apology after a failed transition. No automatic retry.
async fn apologize(bot: &Bot, chat_id: i64) {
    notify(
        bot,
        chat_id,
        "Something went wrong on our side. Please try again.",
    )
    .await;
}

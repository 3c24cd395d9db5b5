// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve` subcommand: wire the adapters and run long polling.

use std::sync::Arc;

use ombud_config::OmbudConfig;
use ombud_core::traits::{Mailer, Messenger, RequestStore};
use ombud_core::OmbudError;
use ombud_dialog::{Destination, Destinations, Lifecycle};
use ombud_mailer::{NoopMailer, SmtpMailer};
use ombud_storage::SqliteStore;
use ombud_telegram::{TelegramGateway, TelegramMessenger};
use tracing::{info, warn};

pub async fn run(config: OmbudConfig) -> Result<(), OmbudError> {
    let token = config
        .bot
        .token
        .clone()
        .ok_or_else(|| OmbudError::Config("bot.token is required to serve".into()))?;
    let routes = Arc::new(build_routes(&config)?);
    let mailer = build_mailer(&config)?;

    let store: Arc<dyn RequestStore> =
        Arc::new(SqliteStore::open(&config.storage.database_path).await?);
    info!(path = %config.storage.database_path, "request store ready");

    let bot = ombud_telegram::bot_from_token(&token)?;
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));
    let lifecycle = Arc::new(Lifecycle::new(store, messenger, mailer, routes.clone()));

    info!(
        branches = routes.names().len() - 1,
        "ombud serving"
    );
    TelegramGateway::with_bot(bot, lifecycle).run().await;
    Ok(())
}

/// Build the immutable destination table from configuration.
pub(crate) fn build_routes(config: &OmbudConfig) -> Result<Destinations, OmbudError> {
    let head_chat = config
        .head_office
        .chat_id
        .ok_or_else(|| OmbudError::Config("head_office.chat_id is required to serve".into()))?;

    Ok(Destinations::new(
        config
            .branches
            .iter()
            .map(|b| Destination {
                name: b.name.clone(),
                chat_id: b.chat_id,
                email: b.email.clone(),
            })
            .collect(),
        Destination {
            name: config.head_office.name.clone(),
            chat_id: head_chat,
            email: config.head_office.email.clone(),
        },
    ))
}

/// SMTP mirror when configured, a logging no-op otherwise.
pub(crate) fn build_mailer(config: &OmbudConfig) -> Result<Arc<dyn Mailer>, OmbudError> {
    match (
        &config.smtp.server,
        &config.smtp.username,
        &config.smtp.password,
    ) {
        (Some(server), Some(username), Some(password)) => Ok(Arc::new(SmtpMailer::new(
            server,
            config.smtp.port,
            username,
            password,
        )?)),
        _ => {
            warn!("smtp relay not configured; email mirror disabled");
            Ok(Arc::new(NoopMailer))
        }
    }
}

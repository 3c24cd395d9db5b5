// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP email mirror for the Ombud intake bot.
//!
//! Implements the [`Mailer`] trait over lettre's async SMTP transport
//! with implicit TLS. Used to mirror dispatches and staff replies and
//! to deliver generated reports.

use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use ombud_core::{Mailer, OmbudError};
use tracing::debug;

/// Lettre-backed SMTP mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Connect parameters come from the `[smtp]` configuration section.
    /// The login username doubles as the From address.
    pub fn new(server: &str, port: u16, username: &str, password: &str) -> Result<Self, OmbudError> {
        let from: Mailbox = username.parse().map_err(|e| {
            OmbudError::Config(format!("smtp.username is not a valid address: {e}"))
        })?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(server)
            .map_err(|e| OmbudError::Config(format!("invalid smtp relay `{server}`: {e}")))?
            .port(port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();
        Ok(Self { transport, from })
    }

    fn build_message(
        &self,
        subject: &str,
        body: &str,
        to: &str,
        attachment: Option<(String, Vec<u8>)>,
    ) -> Result<Message, OmbudError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| OmbudError::Validation(format!("invalid recipient address `{to}`: {e}")))?;
        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject);

        let message = match attachment {
            Some((filename, content)) => {
                let content_type = ContentType::parse("application/octet-stream")
                    .map_err(|e| OmbudError::Internal(format!("content type: {e}")))?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body.to_string()))
                        .singlepart(Attachment::new(filename).body(content, content_type)),
                )
            }
            None => builder.body(body.to_string()),
        };
        message.map_err(|e| OmbudError::Delivery {
            message: format!("failed to build email: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        to: &str,
        attachment: Option<&Path>,
    ) -> Result<(), OmbudError> {
        let attachment = match attachment {
            Some(path) => {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "attachment".to_string());
                let content = tokio::fs::read(path).await.map_err(|e| OmbudError::Delivery {
                    message: format!("failed to read attachment {}: {e}", path.display()),
                    source: Some(Box::new(e)),
                })?;
                Some((filename, content))
            }
            None => None,
        };

        let message = self.build_message(subject, body, to, attachment)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| OmbudError::Delivery {
                message: format!("smtp send failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!(to, subject, "email sent");
        Ok(())
    }
}

/// Mailer used when no SMTP relay is configured.
///
/// Drops every message with a log line so the fan-out path stays
/// uniform whether or not the mirror is enabled.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(
        &self,
        subject: &str,
        _body: &str,
        to: &str,
        _attachment: Option<&Path>,
    ) -> Result<(), OmbudError> {
        debug!(to, subject, "email mirror disabled, dropping message");
        Ok(())
    }
}

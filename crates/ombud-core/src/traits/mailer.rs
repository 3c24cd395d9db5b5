// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound email contract.

use std::path::Path;

use async_trait::async_trait;

use crate::error::OmbudError;

/// Outbound email delivery, used to mirror dispatches and replies and
/// to deliver generated reports.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        to: &str,
        attachment: Option<&Path>,
    ) -> Result<(), OmbudError>;
}

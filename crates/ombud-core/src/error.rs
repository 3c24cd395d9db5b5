// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ombud intake bot.

use thiserror::Error;

/// The primary error type used across all Ombud crates.
#[derive(Debug, Error)]
pub enum OmbudError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Rejected input: unknown content kind, unknown branch, malformed button payload.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced entity does not exist: unknown request identity,
    /// or a reply confirmation arriving before any reply text was recorded.
    #[error("not found: {0}")]
    NotFound(String),

    /// Storage backend errors (database connection, query failure, commit failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound delivery errors (chat transport send, email send).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ombud.toml` > `~/.config/ombud/ombud.toml` > `/etc/ombud/ombud.toml`
//! with environment variable overrides via `OMBUD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::OmbudConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ombud/ombud.toml` (system-wide)
/// 3. `~/.config/ombud/ombud.toml` (user XDG config)
/// 4. `./ombud.toml` (local directory)
/// 5. `OMBUD_*` environment variables
pub fn load_config() -> Result<OmbudConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<OmbudConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OmbudConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<OmbudConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OmbudConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(OmbudConfig::default()))
        .merge(Toml::file("/etc/ombud/ombud.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ombud/ombud.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ombud.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `OMBUD_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("OMBUD_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: OMBUD_BOT_TOKEN -> "bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("head_office_", "head_office.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("smtp_", "smtp.", 1)
            .replacen("report_", "report.", 1);
        mapped.into()
    })
}

// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ombud intake bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ombud configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to
/// sensible values; the transport credentials must be supplied before
/// `serve` can run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OmbudConfig {
    /// Bot identity and transport credentials.
    #[serde(default)]
    pub bot: BotConfig,

    /// Branch destinations a request can be routed to.
    #[serde(default)]
    pub branches: Vec<BranchConfig>,

    /// The head-office destination that always receives a copy.
    #[serde(default)]
    pub head_office: HeadOfficeConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// SMTP settings for the email mirror.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Report generation settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl OmbudConfig {
    /// Look up a configured branch by name.
    pub fn branch(&self, name: &str) -> Option<&BranchConfig> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// All destination names a client may choose, head office last.
    pub fn destination_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.branches.iter().map(|b| b.name.as_str()).collect();
        names.push(self.head_office.name.as_str());
        names
    }

    /// Whether the chat id belongs to the static staff allow-list
    /// (any branch channel or the head-office channel).
    pub fn is_staff_chat(&self, chat_id: i64) -> bool {
        self.branches.iter().any(|b| b.chat_id == chat_id)
            || self.head_office.chat_id == Some(chat_id)
    }
}

/// Bot identity and transport credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Bot API token. `None` leaves the transport unconfigured.
    #[serde(default)]
    pub token: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One branch destination: its staff channel and mirror address.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BranchConfig {
    /// Display name, also embedded in branch-selection button payloads.
    pub name: String,

    /// Staff chat id for this branch.
    pub chat_id: i64,

    /// Mirror email address; `None` disables the email copy for this branch.
    #[serde(default)]
    pub email: Option<String>,
}

/// The head-office destination.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeadOfficeConfig {
    /// Display name offered in the branch keyboard.
    #[serde(default = "default_head_office_name")]
    pub name: String,

    /// Staff chat id. `None` leaves the head-office channel unconfigured.
    #[serde(default)]
    pub chat_id: Option<i64>,

    /// Mirror email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for HeadOfficeConfig {
    fn default() -> Self {
        Self {
            name: default_head_office_name(),
            chat_id: None,
            email: None,
        }
    }
}

fn default_head_office_name() -> String {
    "Head Office".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("ombud").join("ombud.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("ombud.db"))
        .to_string_lossy()
        .into_owned()
}

/// SMTP configuration for the email mirror.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// SMTP relay hostname. `None` disables the email mirror.
    #[serde(default)]
    pub server: Option<String>,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Login username, also used as the From address.
    #[serde(default)]
    pub username: Option<String>,

    /// Login password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: default_smtp_port(),
            username: None,
            password: None,
        }
    }
}

fn default_smtp_port() -> u16 {
    465
}

/// Report generation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory where generated report files are written.
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

fn default_report_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("ombud").join("reports"))
        .unwrap_or_else(|| std::path::PathBuf::from("reports"))
        .to_string_lossy()
        .into_owned()
}

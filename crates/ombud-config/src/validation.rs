// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as duplicate branch names and address shapes.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::OmbudConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &OmbudConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Branch names must be non-empty and unique; they are embedded in
    // button payloads and used as routing keys.
    let mut seen_names = HashSet::new();
    for (i, branch) in config.branches.iter().enumerate() {
        if branch.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("branches[{i}].name must not be empty"),
            });
        }
        if !seen_names.insert(&branch.name) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate branch name `{}` in [[branches]] array",
                    branch.name
                ),
            });
        }
        if branch.name == config.head_office.name {
            errors.push(ConfigError::Validation {
                message: format!(
                    "branch name `{}` collides with the head_office name",
                    branch.name
                ),
            });
        }
        if let Some(ref email) = branch.email
            && !email.contains('@')
        {
            errors.push(ConfigError::Validation {
                message: format!("branches[{i}].email `{email}` is not a valid address"),
            });
        }
    }

    if config.head_office.name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "head_office.name must not be empty".to_string(),
        });
    }

    if let Some(ref email) = config.head_office.email
        && !email.contains('@')
    {
        errors.push(ConfigError::Validation {
            message: format!("head_office.email `{email}` is not a valid address"),
        });
    }

    // The email mirror needs credentials when a relay is configured.
    if config.smtp.server.is_some() {
        if config.smtp.username.is_none() {
            errors.push(ConfigError::Validation {
                message: "smtp.username is required when smtp.server is set".to_string(),
            });
        }
        if config.smtp.password.is_none() {
            errors.push(ConfigError::Validation {
                message: "smtp.password is required when smtp.server is set".to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BranchConfig;

    #[test]
    fn default_config_validates() {
        let config = OmbudConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = OmbudConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn duplicate_branch_names_fail_validation() {
        let mut config = OmbudConfig::default();
        config.branches = vec![
            BranchConfig {
                name: "Branch 1".to_string(),
                chat_id: 100,
                email: None,
            },
            BranchConfig {
                name: "Branch 1".to_string(),
                chat_id: 200,
                email: None,
            },
        ];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("duplicate branch name"))
        ));
    }

    #[test]
    fn branch_name_colliding_with_head_office_fails() {
        let mut config = OmbudConfig::default();
        config.branches = vec![BranchConfig {
            name: "Head Office".to_string(),
            chat_id: 100,
            email: None,
        }];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("collides"))
        ));
    }

    #[test]
    fn smtp_server_without_credentials_fails() {
        let mut config = OmbudConfig::default();
        config.smtp.server = Some("mail.example.com".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn bad_email_shape_fails() {
        let mut config = OmbudConfig::default();
        config.head_office.email = Some("not-an-address".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("head_office.email"))
        ));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = OmbudConfig::default();
        config.branches = vec![BranchConfig {
            name: "Branch 1".to_string(),
            chat_id: 100,
            email: Some("branch1@example.com".to_string()),
        }];
        config.head_office.chat_id = Some(999);
        config.head_office.email = Some("office@example.com".to_string());
        config.smtp.server = Some("mail.example.com".to_string());
        config.smtp.username = Some("bot@example.com".to_string());
        config.smtp.password = Some("secret".to_string());
        assert!(validate_config(&config).is_ok());
    }
}

// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ombud support-intake bot.
//!
//! This crate provides the error taxonomy, domain types, button-payload
//! action parsing, and the collaborator traits implemented by the
//! transport, storage, and email adapter crates.

pub mod action;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use action::Action;
pub use error::OmbudError;
pub use types::{ClientId, ContentItem, ContentKind, Request, RequestChanges, RequestId};

pub use traits::{Mailer, Messenger, RequestStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ombud_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = OmbudError::Config("test".into());
        let _validation = OmbudError::Validation("test".into());
        let _not_found = OmbudError::NotFound("test".into());
        let _storage = OmbudError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _delivery = OmbudError::Delivery {
            message: "test".into(),
            source: None,
        };
        let _internal = OmbudError::Internal("test".into());
    }

    #[test]
    fn error_messages_are_prefixed_by_category() {
        assert_eq!(
            OmbudError::Validation("bad branch".into()).to_string(),
            "validation error: bad branch"
        );
        assert_eq!(
            OmbudError::NotFound("request 1".into()).to_string(),
            "not found: request 1"
        );
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any trait module is missing or fails to compile, this
        // test won't compile either.
        fn _assert_store<T: RequestStore>() {}
        fn _assert_messenger<T: Messenger>() {}
        fn _assert_mailer<T: Mailer>() {}
    }
}

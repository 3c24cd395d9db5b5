// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Ombud workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identity of a client request.
///
/// Compact numeric form so it can be embedded in interactive button
/// payloads without inflating them; uniqueness is verified at creation
/// by a lookup-and-retry loop in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub i64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat identity of a client or staff member on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub i64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of one submitted content item.
///
/// The enumeration is closed: anything a client sends that does not map
/// onto one of these is rejected before it reaches storage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Photo,
    Video,
    Voice,
}

impl ContentKind {
    /// Whether this kind carries a transport media reference rather than raw text.
    pub fn is_media(self) -> bool {
        !matches!(self, ContentKind::Text)
    }
}

/// One unit of client-submitted material attached to a request.
///
/// `content` is opaque: raw text for [`ContentKind::Text`], a
/// transport file reference otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub item_id: i64,
    pub request_id: RequestId,
    pub kind: ContentKind,
    pub content: String,
    pub created_at: String,
}

/// A durable client request with its content items in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub request_id: RequestId,
    pub client_id: ClientId,
    /// Destination branch name; `None` until the client has chosen one.
    pub branch: Option<String>,
    pub created_at: String,
    /// The staff reply text; `None` until a staff member has recorded one.
    pub admin_response: Option<String>,
    pub items: Vec<ContentItem>,
}

/// Partial field changes for a request row.
///
/// Only the supplied fields are written; the write is all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct RequestChanges {
    pub branch: Option<String>,
    pub admin_response: Option<String>,
}

impl RequestChanges {
    pub fn is_empty(&self) -> bool {
        self.branch.is_none() && self.admin_response.is_none()
    }
}

/// An interactive button attached to an outbound chat message.
///
/// `payload` is the encoded [`crate::action::Action`] delivered back
/// when the button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// A transport media reference for grouped delivery to staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: ContentKind,
    pub file_id: String,
}

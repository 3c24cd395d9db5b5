// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence contract for requests and their content items.

use async_trait::async_trait;

use crate::error::OmbudError;
use crate::types::{ClientId, ContentKind, Request, RequestChanges, RequestId};

/// Durable store of requests and their content items.
///
/// The store owns identity generation and all row mutation. Every
/// operation is a single logical transaction: a failure leaves prior
/// persisted state unchanged.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Allocate a fresh verified-unique identity and insert the request row.
    ///
    /// A failed insert leaves no row behind.
    async fn create_request(
        &self,
        client_id: ClientId,
        branch: Option<&str>,
    ) -> Result<RequestId, OmbudError>;

    /// Append one content item to a request. Rejected items leave no row.
    async fn append_item(
        &self,
        request_id: RequestId,
        kind: ContentKind,
        content: &str,
    ) -> Result<(), OmbudError>;

    /// Load a request plus all its items in submission order.
    async fn get_request(&self, request_id: RequestId) -> Result<Option<Request>, OmbudError>;

    /// Apply a partial update of the branch and/or staff-reply fields.
    ///
    /// Fails with [`OmbudError::NotFound`] if the identity does not
    /// exist; all supplied fields are written or none are.
    async fn update_request(
        &self,
        request_id: RequestId,
        changes: RequestChanges,
    ) -> Result<(), OmbudError>;

    /// Delete all content items for a request, leaving the row untouched.
    async fn clear_items(&self, request_id: RequestId) -> Result<(), OmbudError>;

    /// Load all requests (with items) created at or after the RFC 3339 cutoff.
    async fn fetch_requests_since(&self, cutoff: &str) -> Result<Vec<Request>, OmbudError>;
}

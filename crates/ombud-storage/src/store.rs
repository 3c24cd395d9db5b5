// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`RequestStore`] trait.

use async_trait::async_trait;

use ombud_core::traits::RequestStore;
use ombud_core::types::{ClientId, ContentKind, Request, RequestChanges, RequestId};
use ombud_core::OmbudError;

use crate::database::Database;
use crate::queries;

/// SQLite-backed request store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the store at the given path, running migrations if needed.
    pub async fn open(path: &str) -> Result<Self, OmbudError> {
        let db = Database::open(path).await?;
        Ok(Self { db })
    }

    /// Returns a reference to the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint and release the underlying connection.
    pub async fn close(&self) -> Result<(), OmbudError> {
        self.db.close().await
    }
}

#[async_trait]
impl RequestStore for SqliteStore {
    async fn create_request(
        &self,
        client_id: ClientId,
        branch: Option<&str>,
    ) -> Result<RequestId, OmbudError> {
        queries::requests::create_request(&self.db, client_id, branch).await
    }

    async fn append_item(
        &self,
        request_id: RequestId,
        kind: ContentKind,
        content: &str,
    ) -> Result<(), OmbudError> {
        queries::items::append_item(&self.db, request_id, kind, content).await
    }

    async fn get_request(&self, request_id: RequestId) -> Result<Option<Request>, OmbudError> {
        queries::requests::get_request(&self.db, request_id).await
    }

    async fn update_request(
        &self,
        request_id: RequestId,
        changes: RequestChanges,
    ) -> Result<(), OmbudError> {
        queries::requests::update_request(&self.db, request_id, changes).await
    }

    async fn clear_items(&self, request_id: RequestId) -> Result<(), OmbudError> {
        queries::items::clear_items(&self.db, request_id).await
    }

    async fn fetch_requests_since(&self, cutoff: &str) -> Result<Vec<Request>, OmbudError> {
        queries::requests::fetch_requests_since(&self.db, cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn full_request_lifecycle_through_store() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteStore::open(db_path.to_str().unwrap()).await.unwrap();

        // Create and fill a request.
        let id = store
            .create_request(ClientId(555), Some("Branch 2"))
            .await
            .unwrap();
        store.append_item(id, ContentKind::Text, "Hello").await.unwrap();
        store
            .append_item(id, ContentKind::Photo, "file-abc")
            .await
            .unwrap();

        let request = store.get_request(id).await.unwrap().unwrap();
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].content, "Hello");

        // Discard the draft and restart composition.
        store.clear_items(id).await.unwrap();
        let request = store.get_request(id).await.unwrap().unwrap();
        assert!(request.items.is_empty());
        assert_eq!(request.branch.as_deref(), Some("Branch 2"));

        // Record a staff reply.
        store
            .update_request(
                id,
                RequestChanges {
                    admin_response: Some("Resolved".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let request = store.get_request(id).await.unwrap().unwrap();
        assert_eq!(request.admin_response.as_deref(), Some("Resolved"));

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn trait_object_usability() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("dyn.db");
        let store: std::sync::Arc<dyn RequestStore> = std::sync::Arc::new(
            SqliteStore::open(db_path.to_str().unwrap()).await.unwrap(),
        );
        let id = store.create_request(ClientId(1), None).await.unwrap();
        assert!(store.get_request(id).await.unwrap().is_some());
    }
}

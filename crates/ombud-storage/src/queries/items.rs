// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content item operations.

use std::str::FromStr;

use ombud_core::OmbudError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ContentItem, ContentKind, RequestId};

/// Append one content item to a request.
///
/// The kind is already typed at this boundary; the schema CHECK
/// constraint backstops any write that bypasses the enum.
pub async fn append_item(
    db: &Database,
    request_id: RequestId,
    kind: ContentKind,
    content: &str,
) -> Result<(), OmbudError> {
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO items (request_id, kind, content) VALUES (?1, ?2, ?3)",
                params![request_id.0, kind.to_string(), content],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete all content items for a request, leaving the request row untouched.
pub async fn clear_items(db: &Database, request_id: RequestId) -> Result<(), OmbudError> {
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM items WHERE request_id = ?1",
                params![request_id.0],
            )?;
            tracing::debug!(request_id = request_id.0, deleted, "cleared draft items");
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load a request's items in submission order (item_id ASC).
///
/// Synchronous helper for use inside `call` closures alongside other reads.
pub(crate) fn items_for_request(
    conn: &rusqlite::Connection,
    request_id: RequestId,
) -> rusqlite::Result<Vec<ContentItem>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, request_id, kind, content, created_at
         FROM items WHERE request_id = ?1 ORDER BY item_id ASC",
    )?;
    let rows = stmt.query_map(params![request_id.0], |row| {
        let kind_str: String = row.get(2)?;
        let kind = ContentKind::from_str(&kind_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
        Ok(ContentItem {
            item_id: row.get(0)?,
            request_id: RequestId(row.get(1)?),
            kind,
            content: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

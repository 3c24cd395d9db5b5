// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request row operations.

use ombud_core::OmbudError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ClientId, Request, RequestChanges, RequestId};

/// Create a new request with a freshly allocated identity.
///
/// The identity check and the insert run in one transaction; a failed
/// insert leaves no row behind.
pub async fn create_request(
    db: &Database,
    client_id: ClientId,
    branch: Option<&str>,
) -> Result<RequestId, OmbudError> {
    let branch = branch.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let id = crate::ids::allocate_request_id(&tx)?;
            tx.execute(
                "INSERT INTO requests (request_id, client_id, branch) VALUES (?1, ?2, ?3)",
                params![id, client_id.0, branch],
            )?;
            tx.commit()?;
            Ok(RequestId(id))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load a request plus all its items in submission order.
pub async fn get_request(
    db: &Database,
    request_id: RequestId,
) -> Result<Option<Request>, OmbudError> {
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT request_id, client_id, branch, created_at, admin_response
                 FROM requests WHERE request_id = ?1",
                params![request_id.0],
                row_to_request,
            );
            match result {
                Ok(mut request) => {
                    request.items = crate::queries::items::items_for_request(conn, request_id)?;
                    Ok(Some(request))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a partial update of the branch and/or staff-reply fields.
///
/// Existence is checked inside the same transaction as the write, so
/// either all supplied fields land or none do. A missing identity is a
/// [`OmbudError::NotFound`].
pub async fn update_request(
    db: &Database,
    request_id: RequestId,
    changes: RequestChanges,
) -> Result<(), OmbudError> {
    let found = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM requests WHERE request_id = ?1)",
                params![request_id.0],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(false);
            }
            match (&changes.branch, &changes.admin_response) {
                (Some(branch), Some(reply)) => {
                    tx.execute(
                        "UPDATE requests SET branch = ?1, admin_response = ?2
                         WHERE request_id = ?3",
                        params![branch, reply, request_id.0],
                    )?;
                }
                (Some(branch), None) => {
                    tx.execute(
                        "UPDATE requests SET branch = ?1 WHERE request_id = ?2",
                        params![branch, request_id.0],
                    )?;
                }
                (None, Some(reply)) => {
                    tx.execute(
                        "UPDATE requests SET admin_response = ?1 WHERE request_id = ?2",
                        params![reply, request_id.0],
                    )?;
                }
                (None, None) => {}
            }
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if found {
        Ok(())
    } else {
        Err(OmbudError::NotFound(format!(
            "request {request_id} does not exist"
        )))
    }
}

/// Load all requests (with items) created at or after the RFC 3339 cutoff,
/// oldest first.
pub async fn fetch_requests_since(db: &Database, cutoff: &str) -> Result<Vec<Request>, OmbudError> {
    let cutoff = cutoff.to_string();
    db.connection()
        .call(move |conn| {
            let mut requests = Vec::new();
            {
                let mut stmt = conn.prepare(
                    "SELECT request_id, client_id, branch, created_at, admin_response
                     FROM requests WHERE created_at >= ?1 ORDER BY created_at ASC",
                )?;
                let rows = stmt.query_map(params![cutoff], row_to_request)?;
                for row in rows {
                    requests.push(row?);
                }
            }
            for request in &mut requests {
                request.items =
                    crate::queries::items::items_for_request(conn, request.request_id)?;
            }
            Ok(requests)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn row_to_request(row: &rusqlite::Row<'_>) -> rusqlite::Result<Request> {
    Ok(Request {
        request_id: RequestId(row.get(0)?),
        client_id: ClientId(row.get(1)?),
        branch: row.get(2)?,
        created_at: row.get(3)?,
        admin_response: row.get(4)?,
        items: Vec::new(),
    })
}

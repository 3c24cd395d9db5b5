// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request identity allocation.
//!
//! Identities are embedded in interactive button payloads, so they are
//! kept compact (six decimal digits) rather than using a full random
//! 128-bit token. Uniqueness is never assumed: each candidate is
//! checked against existing rows and regenerated on collision.

use rand::Rng;
use rusqlite::params;

const ID_MIN: i64 = 100_000;
const ID_MAX: i64 = 1_000_000;

/// Allocate a request id that is verified unused at the time of the call.
///
/// Must run inside the same transaction as the insert that claims the
/// id, so the check-then-insert pair is atomic.
pub(crate) fn allocate_request_id(conn: &rusqlite::Connection) -> Result<i64, rusqlite::Error> {
    let mut rng = rand::thread_rng();
    loop {
        let candidate: i64 = rng.gen_range(ID_MIN..ID_MAX);
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM requests WHERE request_id = ?1)",
            params![candidate],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(candidate);
        }
    }
}
